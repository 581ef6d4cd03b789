// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::io::{BufWriter, Read, Write};
use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicBool, Ordering},
};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use crate::input::{keyboard, mouse};
use crate::io::{DisplayListener, ReadEvent, UserEvent};
use crate::state::internal::TerminalState;

/// How long the worker sleeps between polls when the stream is quiet.
const IDLE_TICK: Duration = Duration::from_millis(25);

/// Incremental UTF-8 decoding for the xterm profile; incomplete tails
/// carry over to the next chunk, invalid bytes become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let data = std::mem::take(&mut self.pending);
        let mut out = String::with_capacity(data.len());
        let mut rest = data.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(s) => {
                    out.push_str(s);
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    if let Ok(s) = std::str::from_utf8(&rest[..valid]) {
                        out.push_str(s);
                    }
                    match err.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &rest[valid + len..];
                        }
                        None => {
                            self.pending = rest[valid..].to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }
}

/// Raw byte profiles map each byte to the same code point.
fn raw_to_text(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn lock_state(state: &Arc<Mutex<TerminalState>>) -> MutexGuard<'_, TerminalState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Read the inbound stream on its own thread; the worker never blocks
/// on the OS.
pub fn spawn_read_thread(
    mut source: Box<dyn Read + Send>,
    bytes_tx: Sender<ReadEvent>,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut buf = [0_u8; 4096];
        loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            match source.read(&mut buf) {
                Ok(0) => {
                    let _ = bytes_tx.send(ReadEvent::Eof);
                    break;
                }
                Ok(n) => {
                    if bytes_tx.send(ReadEvent::Data(buf[..n].to_vec())).is_err() {
                        break;
                    }
                }
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(IDLE_TICK);
                }
                Err(err) => {
                    if !stop.load(Ordering::Relaxed) {
                        let _ = bytes_tx.send(ReadEvent::Error(err.to_string()));
                    }
                    break;
                }
            }
        }
    })
}

/// Drain the outbound channel into the buffered sink. A failed write
/// closes the terminal.
pub fn spawn_write_thread(
    sink: Box<dyn Write + Send>,
    write_rx: Receiver<Vec<u8>>,
    stop: Arc<AtomicBool>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut writer = BufWriter::new(sink);
        while let Ok(data) = write_rx.recv() {
            if let Err(err) = writer.write_all(&data).and_then(|()| writer.flush()) {
                error!("outbound write failed, closing terminal: {err}");
                stop.store(true, Ordering::Relaxed);
                break;
            }
        }
    })
}

/// The worker: drains the user-event queue ahead of each read batch,
/// funnels bytes through the parser under the state mutex, and signals
/// the display listener outside of it.
#[allow(clippy::too_many_arguments)]
pub fn spawn_worker_thread(
    state: Arc<Mutex<TerminalState>>,
    bytes_rx: Receiver<ReadEvent>,
    user_rx: Receiver<UserEvent>,
    write_tx: Sender<Vec<u8>>,
    listener: Arc<dyn DisplayListener>,
    stop: Arc<AtomicBool>,
    decode_utf8: bool,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let mut decoder = Utf8Decoder::default();
        loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }

            // user input outranks terminal output
            while let Ok(event) = user_rx.try_recv() {
                handle_user_event(&state, &write_tx, &event);
            }

            match bytes_rx.recv_timeout(IDLE_TICK) {
                Ok(ReadEvent::Data(bytes)) => {
                    let text = if decode_utf8 {
                        decoder.push(&bytes)
                    } else {
                        raw_to_text(&bytes)
                    };
                    let mut guard = lock_state(&state);
                    guard.handle_incoming(&text);
                    drop(guard);
                    notify(&state, &listener);
                }
                Ok(ReadEvent::Eof) => {
                    consume_stream_notice(&state, "end of input stream");
                    break;
                }
                Ok(ReadEvent::Error(message)) => {
                    error!("inbound stream failed: {message}");
                    consume_stream_notice(&state, &message);
                    break;
                }
                Err(RecvTimeoutError::Timeout) => {
                    // local echo may have dirtied the display
                    notify(&state, &listener);
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        stop.store(true, Ordering::Relaxed);
        // one last notification so the embedder sees the final screen
        let snapshot = lock_state(&state).visible_display();
        listener.display_changed(&snapshot);
    })
}

fn handle_user_event(
    state: &Arc<Mutex<TerminalState>>,
    write_tx: &Sender<Vec<u8>>,
    event: &UserEvent,
) {
    let mut guard = lock_state(state);
    match event {
        UserEvent::Key(key) => {
            let ctx = guard.key_context();
            let Some(bytes) = keyboard::encode_key(*key, &ctx) else {
                return;
            };
            if ctx.full_duplex {
                drop(guard);
                let _ = write_tx.send(bytes);
            } else {
                // half duplex: the keystroke echoes locally instead
                let text = raw_to_text(&bytes);
                guard.handle_incoming(&text);
            }
        }
        UserEvent::Mouse(event) => {
            let ctx = guard.mouse_context();
            if let Some(bytes) = mouse::encode_mouse(event, &ctx) {
                drop(guard);
                let _ = write_tx.send(bytes);
            }
        }
        UserEvent::Bytes(bytes) => {
            drop(guard);
            let _ = write_tx.send(bytes.clone());
        }
    }
}

/// Dirty screens get the full snapshot; otherwise only a cursor nudge.
/// The listener always runs outside the state mutex.
fn notify(state: &Arc<Mutex<TerminalState>>, listener: &Arc<dyn DisplayListener>) {
    let mut guard = lock_state(state);
    if guard.is_dirty() {
        let snapshot = guard.visible_display();
        guard.clear_dirty();
        drop(guard);
        listener.display_changed(&snapshot);
    } else {
        let snapshot = guard.visible_display();
        drop(guard);
        listener.cursor_moved(&snapshot);
    }
}

/// Surface a stream failure on the screen itself, as red ANSI text fed
/// through the regular parser path.
fn consume_stream_notice(state: &Arc<Mutex<TerminalState>>, message: &str) {
    let banner = format!("\r\n\x1b[0m\x1b[31m[terminal closed: {message}]\x1b[0m\r\n");
    lock_state(state).handle_incoming(&banner);
}
