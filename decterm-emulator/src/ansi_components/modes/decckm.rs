// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use core::fmt;

use crate::ansi_components::mode::SetMode;

use super::ReportMode;

/// Cursor Keys Mode (DECCKM) ?1
///
/// Set sends arrows as SS3 application sequences, reset as ANSI CSI.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Decckm {
    #[default]
    Ansi,
    Application,
}

impl Decckm {
    #[must_use]
    pub const fn new(mode: SetMode) -> Self {
        match mode {
            SetMode::Set => Self::Application,
            SetMode::Reset => Self::Ansi,
        }
    }
}

impl ReportMode for Decckm {
    fn report(&self) -> String {
        match self {
            Self::Ansi => String::from("\x1b[?1;2$y"),
            Self::Application => String::from("\x1b[?1;1$y"),
        }
    }
}

impl fmt::Display for Decckm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ansi => write!(f, "Cursor Keys Mode (DECCKM) ANSI"),
            Self::Application => write!(f, "Cursor Keys Mode (DECCKM) Application"),
        }
    }
}
