// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use decterm_common::colors::TerminalColor;

use crate::ansi::extract_param;

/// One decoded SGR operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectGraphicRendition {
    Reset,
    Bold,
    NormalIntensity,
    Underline,
    NotUnderlined,
    Blink,
    Steady,
    Reverse,
    NotReversed,
    Foreground(TerminalColor),
    Background(TerminalColor),
}

/// Walk a parameter list into SGR operations. Unknown codes are
/// skipped; a malformed 38/48 selector consumes what it can and stops
/// interpreting the extended form.
#[must_use]
pub fn parse_sgr(params: &[Option<u16>]) -> Vec<SelectGraphicRendition> {
    use SelectGraphicRendition as S;

    if params.is_empty() {
        return vec![S::Reset];
    }

    let mut out = Vec::with_capacity(params.len());
    let mut idx = 0;
    while idx < params.len() {
        let code = extract_param(idx, params).unwrap_or(0);
        match code {
            0 => out.push(S::Reset),
            1 => out.push(S::Bold),
            22 => out.push(S::NormalIntensity),
            4 => out.push(S::Underline),
            24 => out.push(S::NotUnderlined),
            5 => out.push(S::Blink),
            25 => out.push(S::Steady),
            7 => out.push(S::Reverse),
            27 => out.push(S::NotReversed),
            30..=37 => out.push(S::Foreground(palette_entry(code - 30))),
            40..=47 => out.push(S::Background(palette_entry(code - 40))),
            90..=97 => out.push(S::Foreground(palette_entry(code - 90 + 8))),
            100..=107 => out.push(S::Background(palette_entry(code - 100 + 8))),
            39 => out.push(S::Foreground(TerminalColor::Default)),
            49 => out.push(S::Background(TerminalColor::DefaultBackground)),
            38 | 48 => {
                let Some((color, consumed)) = extended_color(&params[idx + 1..]) else {
                    debug!("dropping malformed extended color selector");
                    break;
                };
                if code == 38 {
                    out.push(S::Foreground(color));
                } else {
                    out.push(S::Background(color));
                }
                idx += consumed;
            }
            other => {
                debug!("skipping unknown SGR code {other}");
            }
        }
        idx += 1;
    }

    out
}

/// The `38;2;r;g;b` and `38;5;n` continuation forms. Returns the color
/// and how many extra parameters were consumed.
fn extended_color(rest: &[Option<u16>]) -> Option<(TerminalColor, usize)> {
    match extract_param(0, rest)? {
        2 => {
            let r = channel(extract_param(1, rest)?)?;
            let g = channel(extract_param(2, rest)?)?;
            let b = channel(extract_param(3, rest)?)?;
            Some((TerminalColor::Rgb(r, g, b), 4))
        }
        5 => {
            let idx = extract_param(1, rest)?;
            if idx > 255 {
                return None;
            }
            #[allow(clippy::cast_possible_truncation)]
            Some((TerminalColor::Palette(idx as u8), 2))
        }
        _ => None,
    }
}

fn channel(value: u16) -> Option<u8> {
    u8::try_from(value).ok()
}

#[allow(clippy::cast_possible_truncation)]
const fn palette_entry(index: u16) -> TerminalColor {
    TerminalColor::Palette(index as u8)
}
