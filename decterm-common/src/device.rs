// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use core::fmt;

/// The emulated device profile, fixed at construction. Selects
/// identification replies and which protocol features are enabled.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DeviceType {
    Vt100,
    Vt102,
    #[default]
    Vt220,
    Xterm,
}

impl DeviceType {
    /// VT100 and VT102 share keyboard quirks (0x08 backspace, VT100-style
    /// function keys).
    #[must_use]
    pub const fn is_vt10x(self) -> bool {
        matches!(self, Self::Vt100 | Self::Vt102)
    }

    /// Only the xterm profile decodes its input stream as UTF-8.
    #[must_use]
    pub const fn reads_utf8(self) -> bool {
        matches!(self, Self::Xterm)
    }

    /// Sixel is a VT220-and-later feature here.
    #[must_use]
    pub const fn supports_sixel(self) -> bool {
        matches!(self, Self::Vt220 | Self::Xterm)
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vt100 => write!(f, "vt100"),
            Self::Vt102 => write!(f, "vt102"),
            Self::Vt220 => write!(f, "vt220"),
            Self::Xterm => write!(f, "xterm"),
        }
    }
}
