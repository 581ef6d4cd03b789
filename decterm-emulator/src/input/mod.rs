// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

pub mod keyboard;
pub mod mouse;

use decterm_common::device::DeviceType;

use crate::ansi_components::modes::mouse::{MouseEncoding, MouseTrack};

/// Everything keyboard translation needs from the terminal state.
#[derive(Clone, Copy, Debug)]
pub struct KeyEncodeContext {
    pub device: DeviceType,
    pub application_cursor_keys: bool,
    pub application_keypad: bool,
    pub new_line: bool,
    pub vt52: bool,
    pub full_duplex: bool,
}

/// Everything mouse translation needs from the terminal state.
#[derive(Clone, Copy, Debug)]
pub struct MouseEncodeContext {
    pub protocol: MouseTrack,
    pub encoding: MouseEncoding,
    pub text_width: usize,
    pub text_height: usize,
}
