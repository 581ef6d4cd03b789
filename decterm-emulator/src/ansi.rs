// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use core::fmt;

use decterm_common::{charsets::CharacterSet, colors::Rgb};

use crate::ansi_components::{
    osc::{InlineImage, JexerImage},
    sgr::SelectGraphicRendition,
};

/// Normalized terminal effects produced by the scanner.
///
/// Parameters arrive already defaulted where the protocol specifies a
/// default (cursor motions never carry 0); positions are 1-based as on
/// the wire, and the dispatcher applies origin mode and clamping.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalCommand {
    /// A run of printable code points, not yet charset-mapped.
    Text(String),
    Bell,
    Backspace,
    HorizontalTab,
    LineFeed,
    CarriageReturn,
    ShiftOut,
    ShiftIn,

    Index,
    ReverseIndex,
    NextLine,
    TabSet,
    SingleShiftG2,
    SingleShiftG3,
    SaveCursor,
    RestoreCursor,
    KeypadApplication,
    KeypadNumeric,
    FullReset,
    SoftReset,
    ReturnTerminalId,
    /// ESC SP F (7-bit) / ESC SP G (8-bit) response encoding.
    SetC1Transmission(bool),
    DoubleHeightTop,
    DoubleHeightBottom,
    SingleWidthLine,
    DoubleWidthLine,
    ScreenAlignmentTest,
    DesignateCharset {
        slot: usize,
        charset: CharacterSet,
    },
    LockShiftG2Gl,
    LockShiftG3Gl,
    LockShiftG1Gr,
    LockShiftG2Gr,
    LockShiftG3Gr,

    CursorUp(usize),
    CursorDown(usize),
    CursorForward(usize),
    CursorBack(usize),
    CursorNextLine(usize),
    CursorPrevLine(usize),
    /// CHA / HPA, 1-based.
    CursorColumn(usize),
    /// VPA, 1-based.
    CursorRow(usize),
    /// HPR: relative column move.
    CursorColumnRelative(usize),
    /// VPR: relative row move.
    CursorRowRelative(usize),
    /// CUP / HVP, both 1-based.
    CursorPosition {
        row: usize,
        col: usize,
    },

    EraseDisplay {
        mode: u16,
        selective: bool,
    },
    EraseLine {
        mode: u16,
        selective: bool,
    },
    InsertLines(usize),
    DeleteLines(usize),
    InsertChars(usize),
    DeleteChars(usize),
    EraseChars(usize),
    ScrollUp(usize),
    ScrollDown(usize),

    Sgr(Vec<SelectGraphicRendition>),
    SetModes {
        private: bool,
        set: bool,
        params: Vec<u16>,
    },
    RequestMode {
        private: bool,
        param: u16,
    },
    DeviceAttributes,
    SecondaryDeviceAttributes,
    TertiaryDeviceAttributes,
    DeviceStatusReport {
        private: bool,
        param: u16,
    },
    SetScrollRegion {
        top: Option<u16>,
        bottom: Option<u16>,
    },
    TabClear(u16),
    RequestTerminalParameters(u16),
    /// DECSCA: protect (true) or unprotect subsequent cells.
    SetProtection(bool),
    CursorStyle(u16),
    XtVersion,
    /// Media Copy; only the printer-controller toggles matter here.
    MediaCopy {
        private: bool,
        param: u16,
    },

    Vt52EnterAnsiMode,
    Vt52Identify,
    /// ESC Y row col, already rebased to 0.
    Vt52CursorAddress {
        row: usize,
        col: usize,
    },
    Vt52EnterGraphics,
    Vt52ExitGraphics,

    OscSetTitle(String),
    OscPaletteQuery(u8),
    OscPaletteSet(u8, Rgb),
    OscQueryForeground,
    OscQueryBackground,
    JexerImage(JexerImage),
    InlineImage(InlineImage),
    XtGetTcap(Vec<String>),
    HideMousePointer,
    ShowMousePointer,
    /// A complete sixel DCS: header parameters plus the body bytes.
    SixelData {
        params: Vec<u16>,
        data: Vec<u8>,
    },

    /// Recognized and deliberately dropped.
    Ignored,
}

impl fmt::Display for TerminalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "Text({text:?})"),
            Self::SixelData { params, data } => {
                write!(f, "SixelData(params: {params:?}, {} bytes)", data.len())
            }
            other => write!(f, "{other:?}"),
        }
    }
}

/// Read one accumulated parameter, treating missing and empty alike.
#[must_use]
pub fn extract_param(idx: usize, params: &[Option<u16>]) -> Option<u16> {
    params.get(idx).copied().flatten()
}

/// The common "default 1, and 0 means 1" rule for motion counts.
#[must_use]
pub fn count_param(idx: usize, params: &[Option<u16>]) -> usize {
    match extract_param(idx, params) {
        None | Some(0) => 1,
        Some(n) => usize::from(n),
    }
}

/// Parameter with an explicit default for absent/empty entries.
#[must_use]
pub fn param_or(idx: usize, params: &[Option<u16>], default: u16) -> u16 {
    extract_param(idx, params).unwrap_or(default)
}
