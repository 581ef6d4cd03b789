// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use core::fmt;

use crate::ansi_components::mode::SetMode;

use super::ReportMode;

/// Insert/Replace Mode (IRM) 4
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Irm {
    #[default]
    Replace,
    Insert,
}

impl Irm {
    #[must_use]
    pub const fn new(mode: SetMode) -> Self {
        match mode {
            SetMode::Set => Self::Insert,
            SetMode::Reset => Self::Replace,
        }
    }

    #[must_use]
    pub const fn is_insert(self) -> bool {
        matches!(self, Self::Insert)
    }
}

impl ReportMode for Irm {
    fn report(&self) -> String {
        match self {
            Self::Insert => String::from("\x1b[4;1$y"),
            Self::Replace => String::from("\x1b[4;2$y"),
        }
    }
}

impl fmt::Display for Irm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace => write!(f, "Insert/Replace Mode (IRM) Replace"),
            Self::Insert => write!(f, "Insert/Replace Mode (IRM) Insert"),
        }
    }
}
