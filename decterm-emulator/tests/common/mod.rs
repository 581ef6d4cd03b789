// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

// not every integration test uses every helper
#![allow(dead_code)]

use std::sync::Arc;

use crossbeam_channel::{Receiver, unbounded};

use decterm_common::device::DeviceType;
use decterm_emulator::interface::TerminalConfig;
use decterm_emulator::io::{ColorBackend, DefaultColorBackend, DisplayListener, DisplaySnapshot};
use decterm_emulator::state::internal::TerminalState;

/// A listener that answers geometry queries but otherwise ignores
/// everything; tests inspect the state directly.
pub struct QuietListener {
    pub preferred_columns: Option<usize>,
}

impl DisplayListener for QuietListener {
    fn display_changed(&self, _snapshot: &DisplaySnapshot) {}

    fn preferred_columns(&self) -> Option<usize> {
        self.preferred_columns
    }
}

/// A fresh terminal plus the outbound byte channel.
pub fn term(device_type: DeviceType) -> (TerminalState, Receiver<Vec<u8>>) {
    term_with_columns(device_type, None)
}

pub fn term_with_columns(
    device_type: DeviceType,
    preferred_columns: Option<usize>,
) -> (TerminalState, Receiver<Vec<u8>>) {
    let (write_tx, write_rx) = unbounded();
    let config = TerminalConfig {
        device_type,
        ..TerminalConfig::default()
    };
    let listener = Arc::new(QuietListener { preferred_columns });
    let backend: Arc<dyn ColorBackend> = Arc::new(DefaultColorBackend);
    let state = TerminalState::new(&config, write_tx, listener, backend);
    (state, write_rx)
}

/// Feed raw bytes as the reader would for a non-UTF-8 profile.
pub fn feed(state: &mut TerminalState, bytes: &[u8]) {
    let text: String = bytes.iter().map(|&b| char::from(b)).collect();
    state.handle_incoming(&text);
}

/// Everything written outbound since the last drain.
pub fn drain_output(rx: &Receiver<Vec<u8>>) -> Vec<u8> {
    rx.try_iter().flatten().collect()
}
