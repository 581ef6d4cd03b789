// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use core::fmt;

use crate::ansi_components::mode::SetMode;

use super::ReportMode;

/// Sixel Display Mode (DECSDM) ?80
///
/// The polarity follows real hardware: *set* disables sixel scrolling
/// and images render from the top-left corner.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Decsdm {
    #[default]
    SixelScrolling,
    NoSixelScrolling,
}

impl Decsdm {
    #[must_use]
    pub const fn new(mode: SetMode) -> Self {
        match mode {
            SetMode::Set => Self::NoSixelScrolling,
            SetMode::Reset => Self::SixelScrolling,
        }
    }

    #[must_use]
    pub const fn scrolling_enabled(self) -> bool {
        matches!(self, Self::SixelScrolling)
    }
}

impl ReportMode for Decsdm {
    fn report(&self) -> String {
        match self {
            Self::NoSixelScrolling => String::from("\x1b[?80;1$y"),
            Self::SixelScrolling => String::from("\x1b[?80;2$y"),
        }
    }
}

impl fmt::Display for Decsdm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SixelScrolling => write!(f, "Sixel Display Mode (DECSDM) Scrolling"),
            Self::NoSixelScrolling => write!(f, "Sixel Display Mode (DECSDM) No Scrolling"),
        }
    }
}
