// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use core::fmt;

use crate::ansi_components::mode::SetMode;

use super::ReportMode;

/// Text Cursor Enable Mode (DECTCEM) ?25
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Dectcem {
    #[default]
    Show,
    Hide,
}

impl Dectcem {
    #[must_use]
    pub const fn new(mode: SetMode) -> Self {
        match mode {
            SetMode::Set => Self::Show,
            SetMode::Reset => Self::Hide,
        }
    }

    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Show)
    }
}

impl ReportMode for Dectcem {
    fn report(&self) -> String {
        match self {
            Self::Show => String::from("\x1b[?25;1$y"),
            Self::Hide => String::from("\x1b[?25;2$y"),
        }
    }
}

impl fmt::Display for Dectcem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show => write!(f, "Text Cursor Enable Mode (DECTCEM) Visible"),
            Self::Hide => write!(f, "Text Cursor Enable Mode (DECTCEM) Hidden"),
        }
    }
}
