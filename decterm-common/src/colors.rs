// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use conv2::ValueInto;
use std::fmt;

/// A cell's foreground or background: the terminal default, a palette
/// index, or a direct 24-bit value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TerminalColor {
    Default,
    DefaultBackground,
    Palette(u8),
    Rgb(u8, u8, u8),
}

impl TerminalColor {
    /// Resolve to concrete RGB against a palette and the default pair.
    #[must_use]
    pub fn resolve(self, palette: &Palette, defaults: (Rgb, Rgb)) -> Rgb {
        match self {
            Self::Default => defaults.0,
            Self::DefaultBackground => defaults.1,
            Self::Palette(idx) => palette.get(idx),
            Self::Rgb(r, g, b) => Rgb { r, g, b },
        }
    }
}

impl fmt::Display for TerminalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::DefaultBackground => write!(f, "default background"),
            Self::Palette(idx) => write!(f, "palette({idx})"),
            Self::Rgb(r, g, b) => write!(f, "rgb({r}, {g}, {b})"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// X11 query form with 16-bit channels: `rgb:RRRR/GGGG/BBBB`.
    #[must_use]
    pub fn to_x11_spec(self) -> String {
        // 8-bit channel widened by replication, the xterm convention
        format!(
            "rgb:{:04x}/{:04x}/{:04x}",
            u16::from(self.r) * 0x101,
            u16::from(self.g) * 0x101,
            u16::from(self.b) * 0x101
        )
    }
}

/// The 256-entry indexed color table. Entries 0-15 carry the DOS/VGA
/// intensities in ANSI order; 16-231 are the xterm 6x6x6 cube; 232-255
/// the xterm grayscale ramp.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Palette {
    entries: [Rgb; 256],
}

impl Default for Palette {
    fn default() -> Self {
        let mut entries = [Rgb::default(); 256];
        for (idx, slot) in entries.iter_mut().enumerate() {
            *slot = initial_palette_entry(idx);
        }
        Self { entries }
    }
}

impl Palette {
    #[must_use]
    pub const fn get(&self, idx: u8) -> Rgb {
        self.entries[idx as usize]
    }

    pub const fn set(&mut self, idx: u8, rgb: Rgb) {
        self.entries[idx as usize] = rgb;
    }

    /// Reinitialize every entry to its construction-time value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// DOS-style primaries: normal channels at 0xAA, bold at 0x55/0xFF,
/// with color 3 dimmed to the classic brown.
const fn dos_color(idx: usize) -> Rgb {
    match idx {
        0 => Rgb::new(0x00, 0x00, 0x00),
        1 => Rgb::new(0xAA, 0x00, 0x00),
        2 => Rgb::new(0x00, 0xAA, 0x00),
        3 => Rgb::new(0xAA, 0x55, 0x00),
        4 => Rgb::new(0x00, 0x00, 0xAA),
        5 => Rgb::new(0xAA, 0x00, 0xAA),
        6 => Rgb::new(0x00, 0xAA, 0xAA),
        7 => Rgb::new(0xAA, 0xAA, 0xAA),
        8 => Rgb::new(0x55, 0x55, 0x55),
        9 => Rgb::new(0xFF, 0x55, 0x55),
        10 => Rgb::new(0x55, 0xFF, 0x55),
        11 => Rgb::new(0xFF, 0xFF, 0x55),
        12 => Rgb::new(0x55, 0x55, 0xFF),
        13 => Rgb::new(0xFF, 0x55, 0xFF),
        14 => Rgb::new(0x55, 0xFF, 0xFF),
        _ => Rgb::new(0xFF, 0xFF, 0xFF),
    }
}

#[must_use]
pub fn initial_palette_entry(idx: usize) -> Rgb {
    match idx {
        0..=15 => dos_color(idx),
        16..=231 => {
            let r = cube_component(idx, 36).value_into().unwrap_or(0);
            let g = cube_component(idx, 6).value_into().unwrap_or(0);
            let b = cube_component(idx, 1).value_into().unwrap_or(0);
            Rgb::new(r, g, b)
        }
        _ => {
            // 24-step grayscale ramp, 8..=238
            let value = 8 + 10 * (idx - 232);
            let value: u8 = value.value_into().unwrap_or(0);
            Rgb::new(value, value, value)
        }
    }
}

// https://stackoverflow.com/questions/69138165/how-to-get-the-rgb-values-of-a-256-color-palette-terminal-color
#[must_use]
pub const fn cube_component(value: usize, modifier: usize) -> usize {
    let i = ((value - 16) / modifier) % 6;

    if i == 0 { 0 } else { 40 * i + 55 }
}

/// Parse an OSC 4-style color spec: `rgb:RR/GG/BB` (1-4 hex digits per
/// channel) or one of the core named colors.
#[must_use]
pub fn parse_color_spec(spec: &str) -> Option<Rgb> {
    let spec = spec.trim();

    if let Some(channels) = spec.strip_prefix("rgb:") {
        let mut parts = channels.split('/');
        let r = parse_channel(parts.next()?)?;
        let g = parse_channel(parts.next()?)?;
        let b = parse_channel(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }
        return Some(Rgb::new(r, g, b));
    }

    if let Some(hex) = spec.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(Rgb::new(r, g, b));
        }
        return None;
    }

    named_color(spec)
}

/// Scale a 1-4 digit hex channel down to 8 bits.
fn parse_channel(text: &str) -> Option<u8> {
    if text.is_empty() || text.len() > 4 {
        return None;
    }
    let value = u32::from_str_radix(text, 16).ok()?;
    let max = (1_u32 << (4 * text.len() as u32)) - 1;
    let scaled = value * 255 / max;
    scaled.value_into().ok()
}

fn named_color(name: &str) -> Option<Rgb> {
    let idx = match name.to_ascii_lowercase().as_str() {
        "black" => 0,
        "red" => 1,
        "green" => 2,
        "yellow" => 3,
        "blue" => 4,
        "magenta" => 5,
        "cyan" => 6,
        "white" | "gray" | "grey" => 7,
        _ => {
            debug!("unrecognized color name: {name}");
            return None;
        }
    };
    Some(dos_color(idx))
}
