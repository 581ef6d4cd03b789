// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use decterm_common::{
    device::DeviceType,
    input_events::{KeyCode, KeyEvent},
};

use super::KeyEncodeContext;

// https://catern.com/posts/terminal_quirks.html
const fn char_to_ctrl_code(c: u8) -> u8 {
    c & 0b0001_1111
}

/// The three cursor/navigation families the devices emit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ArrowFamily {
    /// `ESC [ X` — ANSI cursor mode.
    Csi,
    /// `ESC O X` — application cursor mode.
    Ss3,
    /// `ESC X` — VT52.
    Vt52,
}

const fn arrow_family(ctx: &KeyEncodeContext) -> ArrowFamily {
    if ctx.vt52 {
        ArrowFamily::Vt52
    } else if ctx.application_cursor_keys {
        ArrowFamily::Ss3
    } else {
        ArrowFamily::Csi
    }
}

/// Translate one key press into wire bytes. `None` means the key has
/// no encoding under the current modes (the caller drops it).
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn encode_key(event: KeyEvent, ctx: &KeyEncodeContext) -> Option<Vec<u8>> {
    let xterm_mods = ctx.device == DeviceType::Xterm && event.has_modifier();

    match event.code {
        KeyCode::Char(c) => {
            let mut bytes = Vec::new();
            if event.alt {
                bytes.push(0x1B);
            }
            if event.ctrl && c.is_ascii() {
                #[allow(clippy::cast_possible_truncation)]
                bytes.push(char_to_ctrl_code(c.to_ascii_uppercase() as u8));
            } else {
                let mut utf8 = [0_u8; 4];
                bytes.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            }
            Some(bytes)
        }
        KeyCode::Enter => {
            if ctx.new_line {
                Some(b"\r\n".to_vec())
            } else {
                Some(vec![0x0D])
            }
        }
        KeyCode::Backspace => {
            if ctx.device.is_vt10x() {
                Some(vec![0x08])
            } else {
                Some(vec![0x7F])
            }
        }
        KeyCode::Tab => Some(vec![0x09]),
        KeyCode::BackTab => {
            if ctx.device == DeviceType::Xterm {
                Some(b"\x1b[Z".to_vec())
            } else {
                Some(vec![0x09])
            }
        }
        KeyCode::Escape => Some(vec![0x1B]),
        KeyCode::ArrowUp => Some(arrow(b'A', event, ctx, xterm_mods)),
        KeyCode::ArrowDown => Some(arrow(b'B', event, ctx, xterm_mods)),
        KeyCode::ArrowRight => Some(arrow(b'C', event, ctx, xterm_mods)),
        KeyCode::ArrowLeft => Some(arrow(b'D', event, ctx, xterm_mods)),
        KeyCode::Home => Some(arrow(b'H', event, ctx, xterm_mods)),
        KeyCode::End => Some(arrow(b'F', event, ctx, xterm_mods)),
        KeyCode::Insert => Some(tilde_key(2, event, xterm_mods)),
        KeyCode::Delete => Some(tilde_key(3, event, xterm_mods)),
        KeyCode::PageUp => Some(tilde_key(5, event, xterm_mods)),
        KeyCode::PageDown => Some(tilde_key(6, event, xterm_mods)),
        KeyCode::Function(n) => function_key(n, event, ctx, xterm_mods),
        KeyCode::Keypad(c) => keypad_key(c, ctx),
    }
}

fn arrow(final_byte: u8, event: KeyEvent, ctx: &KeyEncodeContext, xterm_mods: bool) -> Vec<u8> {
    if xterm_mods {
        return format!("\x1b[1;{}{}", event.xterm_modifier(), char::from(final_byte)).into_bytes();
    }
    match arrow_family(ctx) {
        ArrowFamily::Csi => vec![0x1B, b'[', final_byte],
        ArrowFamily::Ss3 => vec![0x1B, b'O', final_byte],
        ArrowFamily::Vt52 => vec![0x1B, final_byte],
    }
}

fn tilde_key(number: u8, event: KeyEvent, xterm_mods: bool) -> Vec<u8> {
    if xterm_mods {
        format!("\x1b[{number};{}~", event.xterm_modifier()).into_bytes()
    } else {
        format!("\x1b[{number}~").into_bytes()
    }
}

fn function_key(
    n: u8,
    event: KeyEvent,
    ctx: &KeyEncodeContext,
    xterm_mods: bool,
) -> Option<Vec<u8>> {
    match n {
        1..=4 => {
            let final_byte = b'P' + (n - 1);
            if xterm_mods {
                return Some(
                    format!("\x1b[1;{}{}", event.xterm_modifier(), char::from(final_byte))
                        .into_bytes(),
                );
            }
            if ctx.vt52 {
                Some(vec![0x1B, final_byte])
            } else {
                Some(vec![0x1B, b'O', final_byte])
            }
        }
        5..=10 if ctx.device.is_vt10x() => {
            // the VT100 keyboard's auxiliary keypad sequences
            let final_byte = match n {
                5 => b't',
                6 => b'u',
                7 => b'v',
                8 => b'l',
                9 => b'w',
                _ => b'x',
            };
            Some(vec![0x1B, b'O', final_byte])
        }
        5..=12 => {
            let number = match n {
                5 => 15,
                6 => 17,
                7 => 18,
                8 => 19,
                9 => 20,
                10 => 21,
                11 => 23,
                _ => 24,
            };
            if event.has_modifier() {
                Some(format!("\x1b[{number};{}~", event.xterm_modifier()).into_bytes())
            } else {
                Some(format!("\x1b[{number}~").into_bytes())
            }
        }
        other => {
            debug!("no encoding for F{other}");
            None
        }
    }
}

fn keypad_key(c: char, ctx: &KeyEncodeContext) -> Option<Vec<u8>> {
    if !ctx.application_keypad {
        // numeric keypad transmits the plain characters
        let mut utf8 = [0_u8; 4];
        return Some(c.encode_utf8(&mut utf8).as_bytes().to_vec());
    }

    let final_byte = match c {
        '0'..='9' => b'p' + (c as u8 - b'0'),
        '-' => b'm',
        ',' => b'l',
        '.' => b'n',
        '\r' => b'M',
        other => {
            debug!("unknown keypad key {other:?}");
            return None;
        }
    };
    if ctx.vt52 {
        Some(vec![0x1B, b'?', final_byte])
    } else {
        Some(vec![0x1B, b'O', final_byte])
    }
}
