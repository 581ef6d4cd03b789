// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use core::fmt;

use crate::ansi_components::mode::SetMode;

use super::ReportMode;

/// Screen Mode (DECSCNM) ?5
///
/// Set renders the whole screen in reverse video. Freshly scrolled-in
/// lines inherit the flag.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Decscnm {
    #[default]
    Normal,
    Reverse,
}

impl Decscnm {
    #[must_use]
    pub const fn new(mode: SetMode) -> Self {
        match mode {
            SetMode::Set => Self::Reverse,
            SetMode::Reset => Self::Normal,
        }
    }

    #[must_use]
    pub const fn is_reversed(self) -> bool {
        matches!(self, Self::Reverse)
    }
}

impl ReportMode for Decscnm {
    fn report(&self) -> String {
        match self {
            Self::Reverse => String::from("\x1b[?5;1$y"),
            Self::Normal => String::from("\x1b[?5;2$y"),
        }
    }
}

impl fmt::Display for Decscnm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Screen Mode (DECSCNM) Normal"),
            Self::Reverse => write!(f, "Screen Mode (DECSCNM) Reverse"),
        }
    }
}
