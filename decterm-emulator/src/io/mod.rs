// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

pub mod reader;

use decterm_buffer::line::DisplayLine;
use decterm_common::{
    colors::{Rgb, initial_palette_entry},
    input_events::{KeyEvent, MouseEvent},
};

/// A copy of the visible display handed to the listener.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub lines: Vec<DisplayLine>,
    pub cursor_x: usize,
    pub cursor_y: usize,
    pub cursor_visible: bool,
    pub reverse_video: bool,
    pub title: String,
}

/// The embedder's view onto the terminal. Called from the reader
/// thread; implementations marshal to their own UI thread as needed and
/// must not call back into the terminal from these callbacks.
pub trait DisplayListener: Send + Sync {
    /// The screen contents changed since the last notification.
    fn display_changed(&self, snapshot: &DisplaySnapshot);

    /// Nothing drawn changed, but the cursor may have moved.
    fn cursor_moved(&self, snapshot: &DisplaySnapshot) {
        let _ = snapshot;
    }

    fn bell(&self) {}

    fn title_changed(&self, title: &str) {
        let _ = title;
    }

    /// DECCOLM on the xterm profile asks the embedder how wide the
    /// window really is. `None` falls back to the classic 132/80.
    fn preferred_columns(&self) -> Option<usize> {
        None
    }
}

/// Resolves default and palette colors at reset time.
pub trait ColorBackend: Send + Sync {
    fn default_foreground(&self) -> Rgb {
        Rgb::new(0xAA, 0xAA, 0xAA)
    }

    fn default_background(&self) -> Rgb {
        Rgb::new(0x00, 0x00, 0x00)
    }

    /// SGR palette index to RGB, consulted when the color table resets.
    fn palette_rgb(&self, index: u8) -> Rgb {
        initial_palette_entry(usize::from(index))
    }
}

/// The stock backend: DOS 0-15 plus the xterm cube.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultColorBackend;

impl ColorBackend for DefaultColorBackend {}

/// Events queued from the UI thread, drained by the worker ahead of
/// each read so user input outranks terminal output.
#[derive(Clone, Debug)]
pub enum UserEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// Raw bytes to transmit unmodified (paste).
    Bytes(Vec<u8>),
}

/// What the blocking read thread forwards to the worker.
#[derive(Clone, Debug)]
pub enum ReadEvent {
    Data(Vec<u8>),
    Eof,
    Error(String),
}
