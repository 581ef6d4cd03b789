// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use decterm_common::input_events::{MouseButton, MouseEvent, MouseEventKind};

use crate::ansi_components::modes::mouse::MouseEncoding;

use super::MouseEncodeContext;

const fn button_bits(button: MouseButton) -> u32 {
    match button {
        MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
        MouseButton::WheelUp => 64,
        MouseButton::WheelDown => 65,
    }
}

const fn modifier_bits(event: &MouseEvent) -> u32 {
    let mut bits = 0;
    if event.shift {
        bits |= 0x04;
    }
    if event.alt {
        bits |= 0x08;
    }
    if event.ctrl {
        bits |= 0x10;
    }
    bits
}

/// Translate one pointer event into wire bytes per the active protocol
/// and encoding. `None` means the protocol does not report this event.
#[must_use]
pub fn encode_mouse(event: &MouseEvent, ctx: &MouseEncodeContext) -> Option<Vec<u8>> {
    let wanted = match event.kind {
        MouseEventKind::Press => ctx.protocol.reports_press(),
        MouseEventKind::Release => ctx.protocol.reports_release(),
        MouseEventKind::Motion => {
            if event.button.is_some() {
                ctx.protocol.reports_drag()
            } else {
                ctx.protocol.reports_motion()
            }
        }
    };
    if !wanted {
        return None;
    }

    match ctx.encoding {
        MouseEncoding::Sgr | MouseEncoding::SgrPixels => Some(encode_sgr(event, ctx)),
        MouseEncoding::X10 | MouseEncoding::Utf8 => Some(encode_x10(event, ctx)),
    }
}

/// `ESC [ < b ; col ; row M|m`, uppercase for press, lowercase for
/// release. The SGR form keeps the button identity on release.
fn encode_sgr(event: &MouseEvent, ctx: &MouseEncodeContext) -> Vec<u8> {
    let mut b = event.button.map_or(3, button_bits) | modifier_bits(event);
    if event.kind == MouseEventKind::Motion {
        b |= 0x20;
    }

    let (col, row) = if ctx.encoding == MouseEncoding::SgrPixels {
        (
            event.col * ctx.text_width + event.pixel_offset.0 + 1,
            event.row * ctx.text_height + event.pixel_offset.1 + 1,
        )
    } else {
        (event.col + 1, event.row + 1)
    };

    let terminator = if event.kind == MouseEventKind::Release {
        'm'
    } else {
        'M'
    };
    format!("\x1b[<{b};{col};{row}{terminator}").into_bytes()
}

/// `ESC [ M Cb Cx Cy` with everything offset by 32; release collapses
/// to button code 3. UTF-8 mode widens coordinates past 95.
fn encode_x10(event: &MouseEvent, ctx: &MouseEncodeContext) -> Vec<u8> {
    let mut b = if event.kind == MouseEventKind::Release {
        3
    } else {
        event.button.map_or(3, button_bits)
    };
    b |= modifier_bits(event);
    if event.kind == MouseEventKind::Motion {
        b |= 0x20;
    }

    let mut out = b"\x1b[M".to_vec();
    let coords = [
        b + 32,
        u32::try_from(event.col).unwrap_or(u32::MAX).saturating_add(33),
        u32::try_from(event.row).unwrap_or(u32::MAX).saturating_add(33),
    ];
    for value in coords {
        if ctx.encoding == MouseEncoding::Utf8 {
            push_utf8_coord(&mut out, value);
        } else {
            #[allow(clippy::cast_possible_truncation)]
            out.push(value.min(255) as u8);
        }
    }
    out
}

/// Mode 1005 expands values above 0x7F into two-byte UTF-8.
#[allow(clippy::cast_possible_truncation)]
fn push_utf8_coord(out: &mut Vec<u8>, value: u32) {
    let value = value.min(0x7FF);
    if value < 0x80 {
        out.push(value as u8);
    } else {
        out.push(0xC0 | (value >> 6) as u8);
        out.push(0x80 | (value & 0x3F) as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi_components::modes::mouse::MouseTrack;

    fn ctx(protocol: MouseTrack, encoding: MouseEncoding) -> MouseEncodeContext {
        MouseEncodeContext {
            protocol,
            encoding,
            text_width: 8,
            text_height: 16,
        }
    }

    #[test]
    fn off_protocol_reports_nothing() {
        let c = ctx(MouseTrack::Off, MouseEncoding::Sgr);
        let press = MouseEvent::press(MouseButton::Left, 0, 0);
        assert_eq!(encode_mouse(&press, &c), None);
    }

    #[test]
    fn x10_reports_presses_only() {
        let c = ctx(MouseTrack::X10, MouseEncoding::X10);
        let press = MouseEvent::press(MouseButton::Left, 0, 0);
        assert_eq!(encode_mouse(&press, &c), Some(b"\x1b[M \x21\x21".to_vec()));

        let release = MouseEvent::release(MouseButton::Left, 0, 0);
        assert_eq!(encode_mouse(&release, &c), None);
    }

    #[test]
    fn normal_reports_release_as_button_three() {
        let c = ctx(MouseTrack::Normal, MouseEncoding::X10);
        let release = MouseEvent::release(MouseButton::Left, 2, 4);
        // 3+32=35 '#', x=2+33=35 '#', y=4+33=37 '%'
        assert_eq!(encode_mouse(&release, &c), Some(b"\x1b[M##%".to_vec()));
    }

    #[test]
    fn sgr_press_and_release_keep_button_and_case() {
        let c = ctx(MouseTrack::Normal, MouseEncoding::Sgr);
        let mut press = MouseEvent::press(MouseButton::Left, 10, 5);
        press.shift = true;
        assert_eq!(encode_mouse(&press, &c), Some(b"\x1b[<4;11;6M".to_vec()));

        let mut release = MouseEvent::release(MouseButton::Left, 10, 5);
        release.shift = true;
        assert_eq!(encode_mouse(&release, &c), Some(b"\x1b[<4;11;6m".to_vec()));
    }

    #[test]
    fn wheel_buttons_use_the_64_range() {
        let c = ctx(MouseTrack::Normal, MouseEncoding::Sgr);
        let wheel = MouseEvent::press(MouseButton::WheelUp, 0, 0);
        assert_eq!(encode_mouse(&wheel, &c), Some(b"\x1b[<64;1;1M".to_vec()));
        let wheel = MouseEvent::press(MouseButton::WheelDown, 3, 3);
        assert_eq!(encode_mouse(&wheel, &c), Some(b"\x1b[<65;4;4M".to_vec()));
    }

    #[test]
    fn motion_gating_by_protocol() {
        let drag = MouseEvent::motion(Some(MouseButton::Left), 1, 1);
        let hover = MouseEvent::motion(None, 1, 1);

        let normal = ctx(MouseTrack::Normal, MouseEncoding::Sgr);
        assert_eq!(encode_mouse(&drag, &normal), None);
        assert_eq!(encode_mouse(&hover, &normal), None);

        let button = ctx(MouseTrack::ButtonEvent, MouseEncoding::Sgr);
        assert_eq!(encode_mouse(&drag, &button), Some(b"\x1b[<32;2;2M".to_vec()));
        assert_eq!(encode_mouse(&hover, &button), None);

        let any = ctx(MouseTrack::AnyEvent, MouseEncoding::Sgr);
        assert_eq!(encode_mouse(&drag, &any), Some(b"\x1b[<32;2;2M".to_vec()));
        assert_eq!(encode_mouse(&hover, &any), Some(b"\x1b[<35;2;2M".to_vec()));
    }

    #[test]
    fn sgr_pixels_uses_cell_geometry() {
        let c = ctx(MouseTrack::Normal, MouseEncoding::SgrPixels);
        let mut press = MouseEvent::press(MouseButton::Left, 2, 1);
        press.pixel_offset = (3, 7);
        // col = 2*8+3+1 = 20, row = 1*16+7+1 = 24
        assert_eq!(encode_mouse(&press, &c), Some(b"\x1b[<0;20;24M".to_vec()));
    }

    #[test]
    fn utf8_encoding_widens_large_coordinates() {
        let c = ctx(MouseTrack::Normal, MouseEncoding::Utf8);
        let press = MouseEvent::press(MouseButton::Left, 150, 0);
        // 150+33 = 183 = 0xB7 -> 0xC2 0xB7
        assert_eq!(
            encode_mouse(&press, &c),
            Some(vec![0x1B, b'[', b'M', 32, 0xC2, 0xB7, 33])
        );
    }
}
