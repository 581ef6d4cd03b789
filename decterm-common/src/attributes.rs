// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::colors::TerminalColor;

/// The drawing attributes of one cell. Value-like; two attribute sets
/// compare equal iff every field matches.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CellAttributes {
    pub foreground: TerminalColor,
    pub background: TerminalColor,
    pub bold: bool,
    pub underline: bool,
    pub blink: bool,
    pub reverse: bool,
    /// DECSCA guard bit; selective erases leave protected cells alone.
    pub protected: bool,
}

impl Default for CellAttributes {
    fn default() -> Self {
        Self {
            foreground: TerminalColor::Default,
            background: TerminalColor::DefaultBackground,
            bold: false,
            underline: false,
            blink: false,
            reverse: false,
            protected: false,
        }
    }
}

impl CellAttributes {
    /// Back to default colors with every flag cleared.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub const fn set_foreground(&mut self, color: TerminalColor) {
        self.foreground = color;
    }

    pub const fn set_background(&mut self, color: TerminalColor) {
        self.background = color;
    }

    pub const fn set_bold(&mut self, on: bool) {
        self.bold = on;
    }

    pub const fn set_underline(&mut self, on: bool) {
        self.underline = on;
    }

    pub const fn set_blink(&mut self, on: bool) {
        self.blink = on;
    }

    pub const fn set_reverse(&mut self, on: bool) {
        self.reverse = on;
    }

    pub const fn set_protected(&mut self, on: bool) {
        self.protected = on;
    }
}
