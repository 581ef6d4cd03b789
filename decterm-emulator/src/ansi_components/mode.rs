// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use core::fmt;

use crate::ansi_components::modes::{
    decckm::Decckm, decsdm::Decsdm, decscnm::Decscnm, dectcem::Dectcem, irm::Irm, lnm::Lnm,
    mouse::{MouseEncoding, MouseTrack},
    sync_updates::SynchronizedUpdates,
};

/// Whether a mode arrives via SM or RM.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SetMode {
    Set,
    Reset,
}

impl SetMode {
    #[must_use]
    pub const fn is_set(self) -> bool {
        matches!(self, Self::Set)
    }
}

impl fmt::Display for SetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => write!(f, "Set"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

/// The keypad transmit mode (DECKPAM / DECKPNM).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum KeypadMode {
    #[default]
    Numeric,
    Application,
}

/// Every non-saveable mode flag of one terminal. Origin mode and
/// autowrap live in the DECSC saveable record instead.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TerminalModes {
    pub cursor_keys: Decckm,
    pub keypad: KeypadMode,
    pub insert: Irm,
    pub cursor_visible: Dectcem,
    pub reverse_screen: Decscnm,
    pub new_line: Lnm,
    pub sixel_scrolling_disabled: Decsdm,
    pub mouse_protocol: MouseTrack,
    pub mouse_encoding: MouseEncoding,
    pub synchronized_updates: SynchronizedUpdates,
    /// DECSCLM is recorded but smooth scrolling is not emulated.
    pub smooth_scroll: bool,
    pub columns_132: bool,
    /// Mode 1070: sixel color registers persist between images.
    pub shared_sixel_palette: bool,
    /// S8C1T: emit responses with 8-bit C1 introducers.
    pub s8c1t: bool,
    /// Media Copy printer controller; printable bytes are discarded
    /// while engaged.
    pub printer_controller: bool,
    /// Half-duplex terminals echo keys locally instead of transmitting.
    pub full_duplex: bool,
}

impl Default for TerminalModes {
    fn default() -> Self {
        Self {
            cursor_keys: Decckm::default(),
            keypad: KeypadMode::default(),
            insert: Irm::default(),
            cursor_visible: Dectcem::default(),
            reverse_screen: Decscnm::default(),
            new_line: Lnm::default(),
            sixel_scrolling_disabled: Decsdm::default(),
            mouse_protocol: MouseTrack::default(),
            mouse_encoding: MouseEncoding::default(),
            synchronized_updates: SynchronizedUpdates::default(),
            smooth_scroll: false,
            columns_132: false,
            shared_sixel_palette: false,
            s8c1t: false,
            printer_controller: false,
            full_duplex: true,
        }
    }
}
