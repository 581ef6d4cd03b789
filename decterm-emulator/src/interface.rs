// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::io::{Read, Write};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::thread::JoinHandle;

use anyhow::Result;
use crossbeam_channel::{Sender, unbounded};

use decterm_common::{
    device::DeviceType,
    input_events::{KeyEvent, MouseEvent},
    terminal_size::{
        DEFAULT_HEIGHT, DEFAULT_SCROLLBACK_MAX, DEFAULT_TEXT_CELL_HEIGHT,
        DEFAULT_TEXT_CELL_WIDTH, DEFAULT_WIDTH,
    },
};

use crate::error::TerminalIoError;
use crate::io::{
    ColorBackend, DisplayListener, DisplaySnapshot, UserEvent,
    reader::{spawn_read_thread, spawn_worker_thread, spawn_write_thread},
};
use crate::state::internal::TerminalState;

/// Construction-time settings for one terminal.
#[derive(Clone, Copy, Debug)]
pub struct TerminalConfig {
    pub device_type: DeviceType,
    pub width: usize,
    pub height: usize,
    pub scrollback_max: usize,
    /// Pixel geometry of one cell, for image sizing and SGR-pixels
    /// mouse reports.
    pub text_width: usize,
    pub text_height: usize,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            device_type: DeviceType::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scrollback_max: DEFAULT_SCROLLBACK_MAX,
            text_width: DEFAULT_TEXT_CELL_WIDTH,
            text_height: DEFAULT_TEXT_CELL_HEIGHT,
        }
    }
}

/// The embedder-facing handle: owns the worker threads, the user-event
/// queue, and the shared terminal state.
pub struct TerminalEmulator {
    state: Arc<Mutex<TerminalState>>,
    user_tx: Sender<UserEvent>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
}

impl TerminalEmulator {
    /// Bring up a terminal over an inbound byte source and an outbound
    /// sink, and start the reader driver.
    ///
    /// # Errors
    /// Currently infallible; the `Result` reserves room for transport
    /// setup failures.
    pub fn spawn(
        config: &TerminalConfig,
        source: Box<dyn Read + Send>,
        sink: Box<dyn Write + Send>,
        listener: Arc<dyn DisplayListener>,
        backend: Arc<dyn ColorBackend>,
    ) -> Result<Self> {
        let (write_tx, write_rx) = unbounded();
        let (bytes_tx, bytes_rx) = unbounded();
        let (user_tx, user_rx) = unbounded();
        let stop = Arc::new(AtomicBool::new(false));

        let state = Arc::new(Mutex::new(TerminalState::new(
            config,
            write_tx.clone(),
            listener.clone(),
            backend,
        )));

        let reader = spawn_read_thread(source, bytes_tx, stop.clone());
        let writer = spawn_write_thread(sink, write_rx, stop.clone());
        let worker = spawn_worker_thread(
            state.clone(),
            bytes_rx,
            user_rx,
            write_tx,
            listener,
            stop.clone(),
            config.device_type.reads_utf8(),
        );

        Ok(Self {
            state,
            user_tx,
            stop,
            worker: Some(worker),
            reader: Some(reader),
            writer: Some(writer),
        })
    }

    /// Shared state handle, for embedders that render directly.
    #[must_use]
    pub const fn state(&self) -> &Arc<Mutex<TerminalState>> {
        &self.state
    }

    /// Queue a key press for translation and transmission.
    ///
    /// # Errors
    /// Fails once the terminal is closed.
    pub fn send_key(&self, event: KeyEvent) -> Result<()> {
        self.user_tx
            .send(UserEvent::Key(event))
            .map_err(|_| TerminalIoError::Closed.into())
    }

    /// Queue a pointer event for translation and transmission.
    ///
    /// # Errors
    /// Fails once the terminal is closed.
    pub fn send_mouse(&self, event: MouseEvent) -> Result<()> {
        self.user_tx
            .send(UserEvent::Mouse(event))
            .map_err(|_| TerminalIoError::Closed.into())
    }

    /// Queue raw bytes (paste) for transmission.
    ///
    /// # Errors
    /// Fails once the terminal is closed.
    pub fn send_bytes(&self, bytes: Vec<u8>) -> Result<()> {
        self.user_tx
            .send(UserEvent::Bytes(bytes))
            .map_err(|_| TerminalIoError::Closed.into())
    }

    /// A copy of the current visible display (honoring any active
    /// synchronized-update window).
    #[must_use]
    pub fn visible_display(&self) -> DisplaySnapshot {
        match self.state.lock() {
            Ok(mut guard) => guard.visible_display(),
            Err(poisoned) => poisoned.into_inner().visible_display(),
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Stop the reader driver and close both streams. Idempotent; the
    /// final "display changed" notification is delivered by the worker
    /// on its way out.
    pub fn close(&mut self) {
        if self.stop.swap(true, Ordering::Relaxed) {
            return;
        }
        if let Some(worker) = self.worker.take() {
            if let Err(err) = worker.join() {
                warn!("worker thread panicked: {err:?}");
            }
        }
        // the reader may be parked in a blocking read; it exits at the
        // next wakeup, so it is detached rather than joined
        drop(self.reader.take());
        drop(self.writer.take());
    }
}

impl Drop for TerminalEmulator {
    fn drop(&mut self) {
        self.close();
    }
}
