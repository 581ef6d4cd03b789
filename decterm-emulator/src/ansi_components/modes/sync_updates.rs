// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use core::fmt;

use crate::ansi_components::mode::SetMode;

use super::ReportMode;

/// Synchronized Output ?2026
///
/// While set, the listener sees a frozen snapshot of the display (up to
/// 125 ms old); reset flushes a final update.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SynchronizedUpdates {
    #[default]
    Draw,
    DontDraw,
}

impl SynchronizedUpdates {
    #[must_use]
    pub const fn new(mode: SetMode) -> Self {
        match mode {
            SetMode::Set => Self::DontDraw,
            SetMode::Reset => Self::Draw,
        }
    }

    #[must_use]
    pub const fn is_frozen(self) -> bool {
        matches!(self, Self::DontDraw)
    }
}

impl ReportMode for SynchronizedUpdates {
    fn report(&self) -> String {
        match self {
            Self::DontDraw => String::from("\x1b[?2026;1$y"),
            Self::Draw => String::from("\x1b[?2026;2$y"),
        }
    }
}

impl fmt::Display for SynchronizedUpdates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draw => write!(f, "Synchronized Updates Draw"),
            Self::DontDraw => write!(f, "Synchronized Updates Don't Draw"),
        }
    }
}
