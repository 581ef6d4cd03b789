// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use decterm_common::charsets::CharacterSet;

use crate::ansi::TerminalCommand;
use crate::ansi_components::{csi, dcs, osc};

/// The canonical scanner states. CAN, SUB, ESC and the C1 introducers
/// move between them from anywhere; everything else is state-local.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScanState {
    Ground,
    Escape,
    EscapeIntermediate,
    CsiEntry,
    CsiParam,
    CsiIntermediate,
    CsiIgnore,
    DcsEntry,
    DcsIntermediate,
    DcsParam,
    DcsPassthrough,
    DcsIgnore,
    DcsSixel,
    DcsXtgettcap,
    SosPmApcString,
    OscString,
    Vt52DirectCursorAddress,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum StringKind {
    Sos,
    Pm,
    Apc,
}

/// CSI and DCS sequences carry at most this many parameters; extras
/// are dropped on the floor.
pub const MAX_PARAMS: usize = 16;

/// Feeds one decoded code point at a time and accumulates normalized
/// commands. The consume path is total: no input can make it fail.
#[derive(Debug)]
pub struct Scanner {
    state: ScanState,
    params: Vec<Option<u16>>,
    cur_param: Option<u32>,
    private_marker: Option<u8>,
    intermediates: Vec<u8>,
    string_buf: Vec<u8>,
    dcs_params: Vec<u16>,
    string_kind: StringKind,
    string_esc: bool,
    vt52_mode: bool,
    vt52_row: Option<u32>,
    text: String,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ScanState::Ground,
            params: Vec::new(),
            cur_param: None,
            private_marker: None,
            intermediates: Vec::new(),
            string_buf: Vec::new(),
            dcs_params: Vec::new(),
            string_kind: StringKind::Sos,
            string_esc: false,
            vt52_mode: false,
            vt52_row: None,
            text: String::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> ScanState {
        self.state
    }

    /// DECANM: the dispatcher flips this when mode 2 changes.
    pub const fn set_vt52_mode(&mut self, vt52: bool) {
        self.vt52_mode = vt52;
    }

    #[must_use]
    pub const fn is_vt52_mode(&self) -> bool {
        self.vt52_mode
    }

    /// Abort any in-flight sequence, e.g. on RIS.
    pub fn reset(&mut self) {
        self.clear_sequence();
        self.string_buf.clear();
        self.string_esc = false;
        self.text.clear();
        self.state = ScanState::Ground;
    }

    /// Emit any coalesced printable run. Call after feeding a chunk.
    pub fn flush(&mut self, out: &mut Vec<TerminalCommand>) {
        if !self.text.is_empty() {
            out.push(TerminalCommand::Text(std::mem::take(&mut self.text)));
        }
    }

    fn clear_sequence(&mut self) {
        self.params.clear();
        self.cur_param = None;
        self.private_marker = None;
        self.intermediates.clear();
        self.dcs_params.clear();
        self.vt52_row = None;
    }

    const fn in_string(&self) -> bool {
        matches!(
            self.state,
            ScanState::OscString
                | ScanState::DcsSixel
                | ScanState::DcsXtgettcap
                | ScanState::DcsPassthrough
                | ScanState::DcsIgnore
                | ScanState::SosPmApcString
        )
    }

    #[allow(clippy::too_many_lines)]
    pub fn consume(&mut self, c: char, out: &mut Vec<TerminalCommand>) {
        let cp = u32::from(c);

        if self.in_string() {
            self.consume_in_string(c, out);
            return;
        }

        // Transitions that fire from every non-string state.
        match cp {
            0x18 | 0x1A => {
                self.flush(out);
                self.clear_sequence();
                self.state = ScanState::Ground;
                return;
            }
            0x1B => {
                self.flush(out);
                self.clear_sequence();
                self.state = ScanState::Escape;
                return;
            }
            0x9B => {
                self.flush(out);
                self.enter(ScanState::CsiEntry);
                return;
            }
            0x9D => {
                self.flush(out);
                self.enter_string_state(ScanState::OscString);
                return;
            }
            0x90 => {
                self.flush(out);
                self.enter(ScanState::DcsEntry);
                return;
            }
            0x98 | 0x9E | 0x9F => {
                self.flush(out);
                self.string_kind = match cp {
                    0x98 => StringKind::Sos,
                    0x9E => StringKind::Pm,
                    _ => StringKind::Apc,
                };
                self.enter_string_state(ScanState::SosPmApcString);
                return;
            }
            0x7F => return,
            _ => {}
        }

        // C0 controls execute without disturbing an open sequence,
        // except while collecting a VT52 address pair.
        if cp < 0x20 && self.state != ScanState::Vt52DirectCursorAddress {
            self.execute_c0(cp, out);
            return;
        }

        match self.state {
            ScanState::Ground => {
                if (0x80..=0x9F).contains(&cp) {
                    self.flush(out);
                    self.execute_c1(cp, out);
                } else {
                    self.text.push(c);
                }
            }
            ScanState::Escape => {
                if self.vt52_mode {
                    self.escape_vt52(c, out);
                } else {
                    self.escape_ansi(c, out);
                }
            }
            ScanState::EscapeIntermediate => match cp {
                0x20..=0x2F => {
                    self.collect_intermediate(cp);
                }
                0x30..=0x7E => {
                    let command = self.dispatch_escape_intermediate(cp);
                    out.push(command);
                    self.enter(ScanState::Ground);
                }
                _ => self.enter(ScanState::Ground),
            },
            ScanState::CsiEntry => match cp {
                0x30..=0x39 => {
                    self.push_digit(cp);
                    self.state = ScanState::CsiParam;
                }
                0x3B => {
                    self.end_param();
                    self.state = ScanState::CsiParam;
                }
                0x3A => self.state = ScanState::CsiIgnore,
                0x3C..=0x3F => {
                    self.private_marker = Some(byte_of(cp));
                    self.state = ScanState::CsiParam;
                }
                0x20..=0x2F => {
                    self.collect_intermediate(cp);
                    self.state = ScanState::CsiIntermediate;
                }
                0x40..=0x7E => self.finish_csi(cp, out),
                _ => self.enter(ScanState::Ground),
            },
            ScanState::CsiParam => match cp {
                0x30..=0x39 => self.push_digit(cp),
                0x3B => self.end_param(),
                0x3A | 0x3C..=0x3F => self.state = ScanState::CsiIgnore,
                0x20..=0x2F => {
                    self.end_param();
                    self.collect_intermediate(cp);
                    self.state = ScanState::CsiIntermediate;
                }
                0x40..=0x7E => self.finish_csi(cp, out),
                _ => self.enter(ScanState::Ground),
            },
            ScanState::CsiIntermediate => match cp {
                0x20..=0x2F => self.collect_intermediate(cp),
                0x30..=0x3F => self.state = ScanState::CsiIgnore,
                0x40..=0x7E => self.finish_csi(cp, out),
                _ => self.enter(ScanState::Ground),
            },
            ScanState::CsiIgnore => {
                if (0x40..=0x7E).contains(&cp) {
                    self.enter(ScanState::Ground);
                }
            }
            ScanState::DcsEntry => match cp {
                0x30..=0x39 => {
                    self.push_digit(cp);
                    self.state = ScanState::DcsParam;
                }
                0x3B => {
                    self.end_param();
                    self.state = ScanState::DcsParam;
                }
                0x3A => self.state = ScanState::DcsIgnore,
                0x3C..=0x3F => {
                    self.private_marker = Some(byte_of(cp));
                    self.state = ScanState::DcsParam;
                }
                0x20..=0x2F => {
                    self.collect_intermediate(cp);
                    self.state = ScanState::DcsIntermediate;
                }
                0x40..=0x7E => self.finish_dcs(cp),
                _ => self.enter(ScanState::Ground),
            },
            ScanState::DcsParam => match cp {
                0x30..=0x39 => self.push_digit(cp),
                0x3B => self.end_param(),
                0x3A | 0x3C..=0x3F => self.state = ScanState::DcsIgnore,
                0x20..=0x2F => {
                    self.end_param();
                    self.collect_intermediate(cp);
                    self.state = ScanState::DcsIntermediate;
                }
                0x40..=0x7E => self.finish_dcs(cp),
                _ => self.enter(ScanState::Ground),
            },
            ScanState::DcsIntermediate => match cp {
                0x20..=0x2F => self.collect_intermediate(cp),
                0x30..=0x3F => self.state = ScanState::DcsIgnore,
                0x40..=0x7E => self.finish_dcs(cp),
                _ => self.enter(ScanState::Ground),
            },
            ScanState::Vt52DirectCursorAddress => {
                if let Some(row) = self.vt52_row.take() {
                    out.push(TerminalCommand::Vt52CursorAddress {
                        row: row.saturating_sub(0x20) as usize,
                        col: cp.saturating_sub(0x20) as usize,
                    });
                    self.enter(ScanState::Ground);
                } else {
                    self.vt52_row = Some(cp);
                }
            }
            // string states are handled above
            ScanState::DcsPassthrough
            | ScanState::DcsIgnore
            | ScanState::DcsSixel
            | ScanState::DcsXtgettcap
            | ScanState::OscString
            | ScanState::SosPmApcString => unreachable!(),
        }
    }

    fn consume_in_string(&mut self, c: char, out: &mut Vec<TerminalCommand>) {
        let cp = u32::from(c);

        if self.string_esc {
            self.string_esc = false;
            if cp == 0x5C {
                self.terminate_string(out);
                return;
            }
            // an unterminated string dies here; the ESC starts over
            debug!("string sequence aborted by ESC");
            self.string_buf.clear();
            self.clear_sequence();
            self.state = ScanState::Escape;
            self.consume(c, out);
            return;
        }

        match cp {
            0x1B => self.string_esc = true,
            0x9C => self.terminate_string(out),
            0x18 | 0x1A => {
                self.string_buf.clear();
                self.clear_sequence();
                self.state = ScanState::Ground;
            }
            0x07 if self.state == ScanState::OscString => self.terminate_string(out),
            _ => match self.state {
                ScanState::DcsPassthrough | ScanState::DcsIgnore => {}
                ScanState::SosPmApcString | ScanState::OscString => {
                    let mut utf8 = [0_u8; 4];
                    self.string_buf
                        .extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                }
                _ => {
                    // sixel and tcap payloads are byte-oriented
                    if cp <= 0xFF {
                        self.string_buf.push(byte_of(cp));
                    }
                }
            },
        }
    }

    fn terminate_string(&mut self, out: &mut Vec<TerminalCommand>) {
        match self.state {
            ScanState::OscString => {
                out.extend(osc::parse(&self.string_buf));
            }
            ScanState::DcsSixel => {
                out.push(TerminalCommand::SixelData {
                    params: self.dcs_params.clone(),
                    data: std::mem::take(&mut self.string_buf),
                });
            }
            ScanState::DcsXtgettcap => {
                out.push(TerminalCommand::XtGetTcap(dcs::parse_xtgettcap(
                    &self.string_buf,
                )));
            }
            ScanState::SosPmApcString => {
                if self.string_kind == StringKind::Pm {
                    match self.string_buf.as_slice() {
                        b"hideMousePointer" => out.push(TerminalCommand::HideMousePointer),
                        b"showMousePointer" => out.push(TerminalCommand::ShowMousePointer),
                        other => {
                            debug!("unrecognized PM message {:?}", String::from_utf8_lossy(other));
                        }
                    }
                }
            }
            _ => {}
        }
        self.string_buf.clear();
        self.enter(ScanState::Ground);
    }

    fn enter(&mut self, state: ScanState) {
        self.clear_sequence();
        self.state = state;
    }

    fn enter_string_state(&mut self, state: ScanState) {
        self.clear_sequence();
        self.string_buf.clear();
        self.string_esc = false;
        self.state = state;
    }

    fn execute_c0(&mut self, cp: u32, out: &mut Vec<TerminalCommand>) {
        let command = match cp {
            0x07 => TerminalCommand::Bell,
            0x08 => TerminalCommand::Backspace,
            0x09 => TerminalCommand::HorizontalTab,
            0x0A..=0x0C => TerminalCommand::LineFeed,
            0x0D => TerminalCommand::CarriageReturn,
            0x0E => TerminalCommand::ShiftOut,
            0x0F => TerminalCommand::ShiftIn,
            _ => return,
        };
        self.flush(out);
        out.push(command);
    }

    fn execute_c1(&mut self, cp: u32, out: &mut Vec<TerminalCommand>) {
        let command = match cp {
            0x84 => TerminalCommand::Index,
            0x85 => TerminalCommand::NextLine,
            0x88 => TerminalCommand::TabSet,
            0x8D => TerminalCommand::ReverseIndex,
            0x8E => TerminalCommand::SingleShiftG2,
            0x8F => TerminalCommand::SingleShiftG3,
            0x9A => TerminalCommand::ReturnTerminalId,
            _ => return,
        };
        out.push(command);
    }

    #[allow(clippy::too_many_lines)]
    fn escape_ansi(&mut self, c: char, out: &mut Vec<TerminalCommand>) {
        let cp = u32::from(c);
        if (0x20..=0x2F).contains(&cp) {
            self.collect_intermediate(cp);
            self.state = ScanState::EscapeIntermediate;
            return;
        }

        let command = match c {
            '[' => {
                self.enter(ScanState::CsiEntry);
                return;
            }
            ']' => {
                self.enter_string_state(ScanState::OscString);
                return;
            }
            'P' => {
                self.enter(ScanState::DcsEntry);
                return;
            }
            'X' | '^' | '_' => {
                self.string_kind = match c {
                    'X' => StringKind::Sos,
                    '^' => StringKind::Pm,
                    _ => StringKind::Apc,
                };
                self.enter_string_state(ScanState::SosPmApcString);
                return;
            }
            '\\' => {
                // stray ST
                self.enter(ScanState::Ground);
                return;
            }
            '7' => TerminalCommand::SaveCursor,
            '8' => TerminalCommand::RestoreCursor,
            'D' => TerminalCommand::Index,
            'E' => TerminalCommand::NextLine,
            'H' => TerminalCommand::TabSet,
            'M' => TerminalCommand::ReverseIndex,
            'N' => TerminalCommand::SingleShiftG2,
            'O' => TerminalCommand::SingleShiftG3,
            'Z' => TerminalCommand::ReturnTerminalId,
            '=' => TerminalCommand::KeypadApplication,
            '>' => TerminalCommand::KeypadNumeric,
            'c' => TerminalCommand::FullReset,
            'n' => TerminalCommand::LockShiftG2Gl,
            'o' => TerminalCommand::LockShiftG3Gl,
            '|' => TerminalCommand::LockShiftG3Gr,
            '}' => TerminalCommand::LockShiftG2Gr,
            '~' => TerminalCommand::LockShiftG1Gr,
            other => {
                debug!("ignoring ESC {other:?}");
                TerminalCommand::Ignored
            }
        };
        out.push(command);
        self.enter(ScanState::Ground);
    }

    fn escape_vt52(&mut self, c: char, out: &mut Vec<TerminalCommand>) {
        let command = match c {
            'A' => TerminalCommand::CursorUp(1),
            'B' => TerminalCommand::CursorDown(1),
            'C' => TerminalCommand::CursorForward(1),
            'D' => TerminalCommand::CursorBack(1),
            'F' => TerminalCommand::Vt52EnterGraphics,
            'G' => TerminalCommand::Vt52ExitGraphics,
            'H' => TerminalCommand::CursorPosition { row: 1, col: 1 },
            'I' => TerminalCommand::ReverseIndex,
            'J' => TerminalCommand::EraseDisplay {
                mode: 0,
                selective: false,
            },
            'K' => TerminalCommand::EraseLine {
                mode: 0,
                selective: false,
            },
            'Y' => {
                self.enter(ScanState::Vt52DirectCursorAddress);
                return;
            }
            'Z' => TerminalCommand::Vt52Identify,
            '=' => TerminalCommand::KeypadApplication,
            '>' => TerminalCommand::KeypadNumeric,
            '<' => TerminalCommand::Vt52EnterAnsiMode,
            other => {
                debug!("ignoring VT52 ESC {other:?}");
                TerminalCommand::Ignored
            }
        };
        out.push(command);
        self.enter(ScanState::Ground);
    }

    fn dispatch_escape_intermediate(&mut self, final_cp: u32) -> TerminalCommand {
        let final_byte = byte_of(final_cp);
        match self.intermediates.first().copied() {
            Some(b'#') => match final_byte {
                b'3' => TerminalCommand::DoubleHeightTop,
                b'4' => TerminalCommand::DoubleHeightBottom,
                b'5' => TerminalCommand::SingleWidthLine,
                b'6' => TerminalCommand::DoubleWidthLine,
                b'8' => TerminalCommand::ScreenAlignmentTest,
                _ => TerminalCommand::Ignored,
            },
            Some(b' ') => match final_byte {
                b'F' => TerminalCommand::SetC1Transmission(false),
                b'G' => TerminalCommand::SetC1Transmission(true),
                _ => TerminalCommand::Ignored,
            },
            Some(designator @ (b'(' | b')' | b'*' | b'+')) => {
                let slot = match designator {
                    b'(' => 0,
                    b')' => 1,
                    b'*' => 2,
                    _ => 3,
                };
                CharacterSet::from_designator(final_byte).map_or_else(
                    || {
                        debug!("unknown charset designator {:?}", char::from(final_byte));
                        TerminalCommand::Ignored
                    },
                    |charset| TerminalCommand::DesignateCharset { slot, charset },
                )
            }
            Some(designator @ (b'-' | b'.' | b'/')) => {
                let slot = match designator {
                    b'-' => 1,
                    b'.' => 2,
                    _ => 3,
                };
                // 96-character sets; Latin-1 maps onto DEC Supplemental
                let charset = if final_byte == b'A' {
                    Some(CharacterSet::DecSupplemental)
                } else {
                    CharacterSet::from_designator(final_byte)
                };
                charset.map_or(TerminalCommand::Ignored, |charset| {
                    TerminalCommand::DesignateCharset { slot, charset }
                })
            }
            _ => TerminalCommand::Ignored,
        }
    }

    fn collect_intermediate(&mut self, cp: u32) {
        if self.intermediates.len() < 4 {
            self.intermediates.push(byte_of(cp));
        }
    }

    fn push_digit(&mut self, cp: u32) {
        let digit = cp - 0x30;
        let cur = self.cur_param.unwrap_or(0);
        self.cur_param = Some(cur.saturating_mul(10).saturating_add(digit));
    }

    fn end_param(&mut self) {
        if self.params.len() < MAX_PARAMS {
            let value = self
                .cur_param
                .map(|v| u16::try_from(v.min(u32::from(u16::MAX))).unwrap_or(u16::MAX));
            self.params.push(value);
        }
        self.cur_param = None;
    }

    fn finish_csi(&mut self, final_cp: u32, out: &mut Vec<TerminalCommand>) {
        if self.cur_param.is_some() || !self.params.is_empty() {
            self.end_param();
        }
        let command = csi::dispatch(
            self.private_marker,
            &self.intermediates,
            &self.params,
            byte_of(final_cp),
        );
        out.push(command);
        self.enter(ScanState::Ground);
    }

    /// DCS routing: `#q` is XTGETTCAP, a bare `q` is sixel, everything
    /// else is discarded passthrough.
    fn finish_dcs(&mut self, final_cp: u32) {
        if self.cur_param.is_some() || !self.params.is_empty() {
            self.end_param();
        }
        let final_byte = byte_of(final_cp);
        if final_byte == b'q' && self.intermediates == [b'#'] {
            self.string_buf.clear();
            self.string_esc = false;
            self.state = ScanState::DcsXtgettcap;
        } else if final_byte == b'q' && self.intermediates.is_empty() {
            self.dcs_params = self.params.iter().map(|p| p.unwrap_or(0)).collect();
            self.string_buf.clear();
            self.string_esc = false;
            self.state = ScanState::DcsSixel;
        } else {
            debug!("discarding DCS with final {:?}", char::from(final_byte));
            self.string_buf.clear();
            self.string_esc = false;
            self.state = ScanState::DcsPassthrough;
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn byte_of(cp: u32) -> u8 {
    (cp & 0xFF) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scanner: &mut Scanner, bytes: &[u8]) -> Vec<TerminalCommand> {
        let mut out = Vec::new();
        for &b in bytes {
            scanner.consume(char::from(b), &mut out);
        }
        scanner.flush(&mut out);
        out
    }

    #[test]
    fn plain_text_coalesces() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"hello");
        assert_eq!(out, vec![TerminalCommand::Text("hello".to_string())]);
    }

    #[test]
    fn text_splits_around_controls() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"ab\r\ncd");
        assert_eq!(
            out,
            vec![
                TerminalCommand::Text("ab".to_string()),
                TerminalCommand::CarriageReturn,
                TerminalCommand::LineFeed,
                TerminalCommand::Text("cd".to_string()),
            ]
        );
    }

    #[test]
    fn csi_cursor_up() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"\x1b[5A");
        assert_eq!(out, vec![TerminalCommand::CursorUp(5)]);
    }

    #[test]
    fn csi_private_modes() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"\x1b[?25;7h");
        assert_eq!(
            out,
            vec![TerminalCommand::SetModes {
                private: true,
                set: true,
                params: vec![25, 7],
            }]
        );
    }

    #[test]
    fn c0_inside_csi_executes() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"\x1b[1\x0812A");
        assert_eq!(
            out,
            vec![TerminalCommand::Backspace, TerminalCommand::CursorUp(112)]
        );
    }

    #[test]
    fn cancel_aborts_a_sequence() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"\x1b[12\x18A");
        assert_eq!(out, vec![TerminalCommand::Text("A".to_string())]);
    }

    #[test]
    fn colon_routes_to_ignore() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"\x1b[38:2:1:2:3mX");
        assert_eq!(out, vec![TerminalCommand::Text("X".to_string())]);
    }

    #[test]
    fn osc_title_with_bel_and_st() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"\x1b]0;title\x07");
        assert_eq!(
            out,
            vec![TerminalCommand::OscSetTitle("title".to_string())]
        );

        let out = run(&mut scanner, b"\x1b]2;other\x1b\\");
        assert_eq!(
            out,
            vec![TerminalCommand::OscSetTitle("other".to_string())]
        );
    }

    #[test]
    fn sixel_dcs_routes_body() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"\x1bP0;1;0q#1~~\x1b\\");
        assert_eq!(
            out,
            vec![TerminalCommand::SixelData {
                params: vec![0, 1, 0],
                data: b"#1~~".to_vec(),
            }]
        );
    }

    #[test]
    fn xtgettcap_goes_through_hash_q() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"\x1bP#q544E\x1b\\");
        assert_eq!(out, vec![TerminalCommand::XtGetTcap(vec!["TN".to_string()])]);
    }

    #[test]
    fn other_dcs_is_discarded() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"\x1bP1$tsomething\x1b\\after");
        assert_eq!(out, vec![TerminalCommand::Text("after".to_string())]);
    }

    #[test]
    fn pm_mouse_pointer_messages() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"\x1b^hideMousePointer\x1b\\");
        assert_eq!(out, vec![TerminalCommand::HideMousePointer]);

        let out = run(&mut scanner, b"\x1b^showMousePointer\x1b\\");
        assert_eq!(out, vec![TerminalCommand::ShowMousePointer]);

        // SOS content is discarded entirely
        let out = run(&mut scanner, b"\x1bXhideMousePointer\x1b\\");
        assert_eq!(out, vec![]);
    }

    #[test]
    fn vt52_escape_family() {
        let mut scanner = Scanner::new();
        scanner.set_vt52_mode(true);
        let out = run(&mut scanner, b"\x1bA\x1bH\x1bK");
        assert_eq!(
            out,
            vec![
                TerminalCommand::CursorUp(1),
                TerminalCommand::CursorPosition { row: 1, col: 1 },
                TerminalCommand::EraseLine {
                    mode: 0,
                    selective: false
                },
            ]
        );
    }

    #[test]
    fn vt52_direct_cursor_address() {
        let mut scanner = Scanner::new();
        scanner.set_vt52_mode(true);
        // row = 0x25 - 0x20 = 5, col = 0x2A - 0x20 = 10
        let out = run(&mut scanner, b"\x1bY%*");
        assert_eq!(
            out,
            vec![TerminalCommand::Vt52CursorAddress { row: 5, col: 10 }]
        );
    }

    #[test]
    fn vt52_exit_to_ansi() {
        let mut scanner = Scanner::new();
        scanner.set_vt52_mode(true);
        let out = run(&mut scanner, b"\x1b<");
        assert_eq!(out, vec![TerminalCommand::Vt52EnterAnsiMode]);
    }

    #[test]
    fn c1_eight_bit_introducers() {
        let mut scanner = Scanner::new();
        let mut out = Vec::new();
        for c in ['\u{9B}', '5', 'A'] {
            scanner.consume(c, &mut out);
        }
        assert_eq!(out, vec![TerminalCommand::CursorUp(5)]);

        let mut out = Vec::new();
        for c in ['\u{8D}'] {
            scanner.consume(c, &mut out);
        }
        assert_eq!(out, vec![TerminalCommand::ReverseIndex]);
    }

    #[test]
    fn charset_designation() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"\x1b(0\x1b)B");
        assert_eq!(
            out,
            vec![
                TerminalCommand::DesignateCharset {
                    slot: 0,
                    charset: CharacterSet::DecSpecialGraphics
                },
                TerminalCommand::DesignateCharset {
                    slot: 1,
                    charset: CharacterSet::UsAscii
                },
            ]
        );
    }

    #[test]
    fn del_is_discarded() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"a\x7fb");
        assert_eq!(out, vec![TerminalCommand::Text("ab".to_string())]);
    }

    #[test]
    fn params_are_capped() {
        let mut scanner = Scanner::new();
        let mut seq = b"\x1b[".to_vec();
        for i in 0..40 {
            seq.extend_from_slice(format!("{i};").as_bytes());
        }
        seq.push(b'm');
        let out = run(&mut scanner, &seq);
        // still one well-formed SGR command, parameters truncated
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], TerminalCommand::Sgr(_)));
    }

    #[test]
    fn double_width_line_escapes() {
        let mut scanner = Scanner::new();
        let out = run(&mut scanner, b"\x1b#6\x1b#5");
        assert_eq!(
            out,
            vec![
                TerminalCommand::DoubleWidthLine,
                TerminalCommand::SingleWidthLine
            ]
        );
    }
}
