// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use core::fmt;

use super::ReportMode;

/// Which pointer events are reported: modes 1000 / 1002 / 1003 plus the
/// legacy X10 form (9).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MouseTrack {
    #[default]
    Off,
    X10,
    Normal,
    ButtonEvent,
    AnyEvent,
}

impl MouseTrack {
    #[must_use]
    pub const fn mode_number(self) -> u16 {
        match self {
            Self::Off => 0,
            Self::X10 => 9,
            Self::Normal => 1000,
            Self::ButtonEvent => 1002,
            Self::AnyEvent => 1003,
        }
    }

    #[must_use]
    pub const fn reports_press(self) -> bool {
        !matches!(self, Self::Off)
    }

    #[must_use]
    pub const fn reports_release(self) -> bool {
        matches!(self, Self::Normal | Self::ButtonEvent | Self::AnyEvent)
    }

    #[must_use]
    pub const fn reports_drag(self) -> bool {
        matches!(self, Self::ButtonEvent | Self::AnyEvent)
    }

    #[must_use]
    pub const fn reports_motion(self) -> bool {
        matches!(self, Self::AnyEvent)
    }
}

impl ReportMode for MouseTrack {
    fn report(&self) -> String {
        match self {
            Self::Off => String::from("\x1b[?1000;2$y"),
            Self::X10 => String::from("\x1b[?9;1$y"),
            Self::Normal => String::from("\x1b[?1000;1$y"),
            Self::ButtonEvent => String::from("\x1b[?1002;1$y"),
            Self::AnyEvent => String::from("\x1b[?1003;1$y"),
        }
    }
}

impl fmt::Display for MouseTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "Mouse Tracking Off"),
            Self::X10 => write!(f, "Mouse Tracking X10"),
            Self::Normal => write!(f, "Mouse Tracking Normal (1000)"),
            Self::ButtonEvent => write!(f, "Mouse Tracking Button-Event (1002)"),
            Self::AnyEvent => write!(f, "Mouse Tracking Any-Event (1003)"),
        }
    }
}

/// How pointer reports are encoded on the wire: modes 1005 / 1006 /
/// 1016, or the default X10 bytes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum MouseEncoding {
    #[default]
    X10,
    Utf8,
    Sgr,
    SgrPixels,
}

impl MouseEncoding {
    #[must_use]
    pub const fn is_sgr(self) -> bool {
        matches!(self, Self::Sgr | Self::SgrPixels)
    }
}

impl ReportMode for MouseEncoding {
    fn report(&self) -> String {
        match self {
            Self::X10 => String::from("\x1b[?1005;2$y"),
            Self::Utf8 => String::from("\x1b[?1005;1$y"),
            Self::Sgr => String::from("\x1b[?1006;1$y"),
            Self::SgrPixels => String::from("\x1b[?1016;1$y"),
        }
    }
}

impl fmt::Display for MouseEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X10 => write!(f, "Mouse Encoding X10"),
            Self::Utf8 => write!(f, "Mouse Encoding UTF-8 (1005)"),
            Self::Sgr => write!(f, "Mouse Encoding SGR (1006)"),
            Self::SgrPixels => write!(f, "Mouse Encoding SGR-Pixels (1016)"),
        }
    }
}
