// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ansi::{TerminalCommand, count_param, extract_param, param_or};
use crate::ansi_components::sgr::parse_sgr;

/// Resolve a completed CSI sequence to a command.
///
/// `private` is the leading private-marker byte (`<`, `=`, `>`, `?`) if
/// one was collected; `intermediates` are the 0x20-0x2F bytes.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn dispatch(
    private: Option<u8>,
    intermediates: &[u8],
    params: &[Option<u16>],
    final_byte: u8,
) -> TerminalCommand {
    // Intermediate-qualified finals first; they reuse final bytes.
    match (intermediates, final_byte) {
        ([], _) => {}
        (b"$", b'p') => {
            return TerminalCommand::RequestMode {
                private: private == Some(b'?'),
                param: param_or(0, params, 0),
            };
        }
        (b"!", b'p') => return TerminalCommand::SoftReset,
        (b"\"", b'q') => {
            return match param_or(0, params, 0) {
                1 => TerminalCommand::SetProtection(true),
                0 | 2 => TerminalCommand::SetProtection(false),
                other => {
                    debug!("DECSCA with unknown parameter {other}");
                    TerminalCommand::Ignored
                }
            };
        }
        (b" ", b'q') => return TerminalCommand::CursorStyle(param_or(0, params, 0)),
        (_, _) => {
            debug!(
                "ignoring CSI with intermediates {:?} final {:?}",
                intermediates, char::from(final_byte)
            );
            return TerminalCommand::Ignored;
        }
    }

    match final_byte {
        b'A' => TerminalCommand::CursorUp(count_param(0, params)),
        b'B' => TerminalCommand::CursorDown(count_param(0, params)),
        b'C' => TerminalCommand::CursorForward(count_param(0, params)),
        b'D' => TerminalCommand::CursorBack(count_param(0, params)),
        b'E' => TerminalCommand::CursorNextLine(count_param(0, params)),
        b'F' => TerminalCommand::CursorPrevLine(count_param(0, params)),
        b'G' | b'`' => TerminalCommand::CursorColumn(count_param(0, params)),
        b'a' => TerminalCommand::CursorColumnRelative(count_param(0, params)),
        b'd' => TerminalCommand::CursorRow(count_param(0, params)),
        b'e' => TerminalCommand::CursorRowRelative(count_param(0, params)),
        b'H' | b'f' => TerminalCommand::CursorPosition {
            row: count_param(0, params),
            col: count_param(1, params),
        },
        b'J' => TerminalCommand::EraseDisplay {
            mode: param_or(0, params, 0),
            selective: private == Some(b'?'),
        },
        b'K' => TerminalCommand::EraseLine {
            mode: param_or(0, params, 0),
            selective: private == Some(b'?'),
        },
        b'L' => TerminalCommand::InsertLines(count_param(0, params)),
        b'M' => TerminalCommand::DeleteLines(count_param(0, params)),
        b'P' => TerminalCommand::DeleteChars(count_param(0, params)),
        b'@' => TerminalCommand::InsertChars(count_param(0, params)),
        b'X' => TerminalCommand::EraseChars(count_param(0, params)),
        b'S' => TerminalCommand::ScrollUp(count_param(0, params)),
        b'T' => TerminalCommand::ScrollDown(count_param(0, params)),
        b'm' => {
            if private == Some(b'>') {
                // XTMODKEYS; deliberately inert
                TerminalCommand::Ignored
            } else {
                TerminalCommand::Sgr(parse_sgr(params))
            }
        }
        b'h' | b'l' => TerminalCommand::SetModes {
            private: private == Some(b'?'),
            set: final_byte == b'h',
            params: params.iter().copied().flatten().collect(),
        },
        b'c' => match private {
            Some(b'>') => TerminalCommand::SecondaryDeviceAttributes,
            Some(b'=') => TerminalCommand::TertiaryDeviceAttributes,
            None if param_or(0, params, 0) == 0 => TerminalCommand::DeviceAttributes,
            _ => TerminalCommand::Ignored,
        },
        b'q' if private == Some(b'>') => TerminalCommand::XtVersion,
        b'n' => TerminalCommand::DeviceStatusReport {
            private: private == Some(b'?'),
            param: param_or(0, params, 0),
        },
        b'r' if private.is_none() => TerminalCommand::SetScrollRegion {
            top: extract_param(0, params),
            bottom: extract_param(1, params),
        },
        b's' if private.is_none() && params.is_empty() => TerminalCommand::SaveCursor,
        b'u' if private.is_none() => TerminalCommand::RestoreCursor,
        b'g' => TerminalCommand::TabClear(param_or(0, params, 0)),
        b'x' => TerminalCommand::RequestTerminalParameters(param_or(0, params, 0)),
        b'i' => TerminalCommand::MediaCopy {
            private: private == Some(b'?'),
            param: param_or(0, params, 0),
        },
        b't' => {
            // XTWINOPS: window manipulation is not part of the core
            TerminalCommand::Ignored
        }
        other => {
            debug!("ignoring CSI final {:?}", char::from(other));
            TerminalCommand::Ignored
        }
    }
}
