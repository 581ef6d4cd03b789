// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use core::fmt;

use crate::ansi_components::mode::SetMode;

use super::ReportMode;

/// Line Feed / New Line Mode (LNM) 20
///
/// Set makes LF imply CR, and Enter transmit CRLF.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Lnm {
    #[default]
    LineFeed,
    NewLine,
}

impl Lnm {
    #[must_use]
    pub const fn new(mode: SetMode) -> Self {
        match mode {
            SetMode::Set => Self::NewLine,
            SetMode::Reset => Self::LineFeed,
        }
    }

    #[must_use]
    pub const fn is_new_line(self) -> bool {
        matches!(self, Self::NewLine)
    }
}

impl ReportMode for Lnm {
    fn report(&self) -> String {
        match self {
            Self::NewLine => String::from("\x1b[20;1$y"),
            Self::LineFeed => String::from("\x1b[20;2$y"),
        }
    }
}

impl fmt::Display for Lnm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineFeed => write!(f, "New Line Mode (LNM) Line Feed"),
            Self::NewLine => write!(f, "New Line Mode (LNM) New Line"),
        }
    }
}
