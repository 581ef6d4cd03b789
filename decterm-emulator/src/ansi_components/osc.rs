// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::RgbaImage;

use decterm_common::{
    colors::parse_color_spec,
    terminal_size::{MAX_INLINE_IMAGE_BYTES, MAX_JEXER_IMAGE_DIMENSION},
};

use crate::ansi::TerminalCommand;

/// A decoded OSC 444 image, ready for compositing.
#[derive(Debug, Clone, PartialEq)]
pub struct JexerImage {
    pub bitmap: RgbaImage,
    /// `S=1` scrolls the display as the image lands; `S=0` leaves the
    /// cursor where it was.
    pub scroll: bool,
}

/// iTerm2 sizing specs: `auto`, `<n>` cells, `<n>px`, `<n>%`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageExtent {
    Auto,
    Cells(u32),
    Pixels(u32),
    Percent(u32),
}

/// The accepted subset of the iTerm2 inline-image protocol.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub bitmap: RgbaImage,
    pub width: ImageExtent,
    pub height: ImageExtent,
    pub preserve_aspect: bool,
    pub move_cursor: bool,
}

/// Interpret a complete OSC payload (introducer and terminator already
/// stripped). Unknown or malformed sequences dissolve into `Ignored`.
#[must_use]
pub fn parse(payload: &[u8]) -> Vec<TerminalCommand> {
    let text = String::from_utf8_lossy(payload);
    let Some((selector, rest)) = text.split_once(';') else {
        debug!("OSC without selector: {text:?}");
        return vec![TerminalCommand::Ignored];
    };

    match selector {
        "0" | "2" => vec![TerminalCommand::OscSetTitle(rest.to_string())],
        "4" => parse_palette(rest),
        "10" => vec![query_only(rest, TerminalCommand::OscQueryForeground)],
        "11" => vec![query_only(rest, TerminalCommand::OscQueryBackground)],
        "444" => vec![parse_jexer_image(rest)],
        "1337" => vec![parse_iterm_image(rest)],
        other => {
            debug!("unhandled OSC {other}");
            vec![TerminalCommand::Ignored]
        }
    }
}

fn query_only(rest: &str, command: TerminalCommand) -> TerminalCommand {
    if rest == "?" {
        command
    } else {
        // setting the default colors is the embedder's business
        TerminalCommand::Ignored
    }
}

/// OSC 4 carries `idx;spec` pairs; `?` queries, anything else sets.
fn parse_palette(rest: &str) -> Vec<TerminalCommand> {
    let mut out = Vec::new();
    let mut fields = rest.split(';');
    while let (Some(idx), Some(spec)) = (fields.next(), fields.next()) {
        let Ok(idx) = idx.parse::<u8>() else {
            debug!("OSC 4 with bad index {idx:?}");
            continue;
        };
        if spec == "?" {
            out.push(TerminalCommand::OscPaletteQuery(idx));
        } else if let Some(rgb) = parse_color_spec(spec) {
            out.push(TerminalCommand::OscPaletteSet(idx, rgb));
        } else {
            debug!("OSC 4 with unparsable spec {spec:?}");
        }
    }
    if out.is_empty() {
        out.push(TerminalCommand::Ignored);
    }
    out
}

/// OSC 444 — the Jexer image extension.
///
/// `0;W;H;S;base64-RGB` places raw pixels; `1;S;base64-PNG` and
/// `2;S;base64-JPG` are the compressed variants.
fn parse_jexer_image(rest: &str) -> TerminalCommand {
    let fields: Vec<&str> = rest.split(';').collect();
    let command = match fields.as_slice() {
        ["0", width, height, scroll, payload] => {
            decode_jexer_rgb(width, height, scroll, payload)
        }
        ["1" | "2", scroll, payload] => decode_jexer_compressed(scroll, payload),
        _ => None,
    };
    command.unwrap_or_else(|| {
        warn!("discarding malformed OSC 444 image");
        TerminalCommand::Ignored
    })
}

fn decode_jexer_rgb(
    width: &str,
    height: &str,
    scroll: &str,
    payload: &str,
) -> Option<TerminalCommand> {
    let width: usize = width.parse().ok()?;
    let height: usize = height.parse().ok()?;
    if width == 0
        || height == 0
        || width > MAX_JEXER_IMAGE_DIMENSION
        || height > MAX_JEXER_IMAGE_DIMENSION
    {
        return None;
    }
    let scroll = parse_scroll_flag(scroll)?;
    let rgb = decode_base64(payload)?;
    if rgb.len() != width * height * 3 {
        warn!(
            "OSC 444 length mismatch: {} bytes for {width}x{height}",
            rgb.len()
        );
        return None;
    }

    let mut rgba = Vec::with_capacity(width * height * 4);
    for px in rgb.chunks_exact(3) {
        rgba.extend_from_slice(&[px[0], px[1], px[2], 0xFF]);
    }
    let bitmap = RgbaImage::from_raw(u32::try_from(width).ok()?, u32::try_from(height).ok()?, rgba)?;
    Some(TerminalCommand::JexerImage(JexerImage { bitmap, scroll }))
}

fn decode_jexer_compressed(scroll: &str, payload: &str) -> Option<TerminalCommand> {
    let scroll = parse_scroll_flag(scroll)?;
    let data = decode_base64(payload)?;
    let bitmap = decode_probed_image(&data)?;
    let max = u32::try_from(MAX_JEXER_IMAGE_DIMENSION).unwrap_or(u32::MAX);
    if bitmap.width() > max || bitmap.height() > max {
        return None;
    }
    Some(TerminalCommand::JexerImage(JexerImage { bitmap, scroll }))
}

fn parse_scroll_flag(field: &str) -> Option<bool> {
    match field {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}

/// OSC 1337 — the iTerm2 `File=` subset. Only `inline=1` payloads that
/// probe as PNG or JPG are accepted.
#[allow(clippy::too_many_lines)]
fn parse_iterm_image(rest: &str) -> TerminalCommand {
    let Some(args) = rest.strip_prefix("File=") else {
        debug!("unhandled OSC 1337 form");
        return TerminalCommand::Ignored;
    };
    let Some((options, payload)) = args.split_once(':') else {
        return TerminalCommand::Ignored;
    };

    let mut inline = false;
    let mut declared_size: Option<usize> = None;
    let mut width = ImageExtent::Auto;
    let mut height = ImageExtent::Auto;
    let mut preserve_aspect = false;
    let mut move_cursor = true;

    for option in options.split(';') {
        let Some((key, value)) = option.split_once('=') else {
            continue;
        };
        match key {
            "inline" => inline = value == "1",
            "size" => declared_size = value.parse().ok(),
            "width" => width = parse_extent(value),
            "height" => height = parse_extent(value),
            "preserveAspectRatio" => preserve_aspect = value == "1",
            "doNotMoveCursor" => move_cursor = value != "1",
            // name= and friends are accepted and unused
            _ => {}
        }
    }

    if !inline {
        debug!("OSC 1337 without inline=1 is a download; discarded");
        return TerminalCommand::Ignored;
    }
    if declared_size.is_some_and(|size| size > MAX_INLINE_IMAGE_BYTES) {
        warn!("OSC 1337 image over the size cap; discarded");
        return TerminalCommand::Ignored;
    }

    let Some(data) = decode_base64(payload) else {
        warn!("OSC 1337 with undecodable payload");
        return TerminalCommand::Ignored;
    };
    if data.len() > MAX_INLINE_IMAGE_BYTES {
        warn!("OSC 1337 decoded payload over the size cap; discarded");
        return TerminalCommand::Ignored;
    }
    let Some(bitmap) = decode_probed_image(&data) else {
        warn!("OSC 1337 payload is neither PNG nor JPG; discarded");
        return TerminalCommand::Ignored;
    };

    TerminalCommand::InlineImage(InlineImage {
        bitmap,
        width,
        height,
        preserve_aspect,
        move_cursor,
    })
}

fn parse_extent(value: &str) -> ImageExtent {
    if value == "auto" {
        return ImageExtent::Auto;
    }
    if let Some(px) = value.strip_suffix("px") {
        return px.parse().map_or(ImageExtent::Auto, ImageExtent::Pixels);
    }
    if let Some(pct) = value.strip_suffix('%') {
        return pct.parse().map_or(ImageExtent::Auto, ImageExtent::Percent);
    }
    value.parse().map_or(ImageExtent::Auto, ImageExtent::Cells)
}

fn decode_base64(payload: &str) -> Option<Vec<u8>> {
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    match BASE64.decode(compact) {
        Ok(data) => Some(data),
        Err(err) => {
            debug!("base64 decode failed: {err}");
            None
        }
    }
}

const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPG_MAGIC: [u8; 3] = [0xFF, 0xD8, 0xFF];

/// Probe the payload header, then hand it to the codec. Anything that
/// is not PNG or JPG is rejected before decoding.
fn decode_probed_image(data: &[u8]) -> Option<RgbaImage> {
    let looks_ok = data.starts_with(&PNG_MAGIC) || data.starts_with(&JPG_MAGIC);
    if !looks_ok {
        return None;
    }
    match image::load_from_memory(data) {
        Ok(img) => Some(img.into_rgba8()),
        Err(err) => {
            warn!("image decode failed: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_set() {
        assert_eq!(
            parse(b"0;hello world"),
            vec![TerminalCommand::OscSetTitle("hello world".to_string())]
        );
        assert_eq!(
            parse(b"2;title"),
            vec![TerminalCommand::OscSetTitle("title".to_string())]
        );
    }

    #[test]
    fn palette_queries_and_sets() {
        assert_eq!(
            parse(b"4;1;?"),
            vec![TerminalCommand::OscPaletteQuery(1)]
        );
        let commands = parse(b"4;1;rgb:ff/00/00;2;?");
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], TerminalCommand::OscPaletteSet(1, _)));
        assert_eq!(commands[1], TerminalCommand::OscPaletteQuery(2));
    }

    #[test]
    fn default_color_queries() {
        assert_eq!(parse(b"10;?"), vec![TerminalCommand::OscQueryForeground]);
        assert_eq!(parse(b"11;?"), vec![TerminalCommand::OscQueryBackground]);
        assert_eq!(parse(b"10;red"), vec![TerminalCommand::Ignored]);
    }

    #[test]
    fn jexer_rgb_image_decodes() {
        // 2x1 image: red pixel, blue pixel
        let rgb = [255, 0, 0, 0, 0, 255];
        let b64 = BASE64.encode(rgb);
        let payload = format!("444;0;2;1;1;{b64}");
        let commands = parse(payload.as_bytes());
        let [TerminalCommand::JexerImage(img)] = commands.as_slice() else {
            panic!("expected one image command, got {commands:?}");
        };
        assert!(img.scroll);
        assert_eq!(img.bitmap.dimensions(), (2, 1));
        assert_eq!(img.bitmap.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.bitmap.get_pixel(1, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn jexer_length_mismatch_is_discarded() {
        let b64 = BASE64.encode([1, 2, 3]);
        let payload = format!("444;0;2;2;0;{b64}");
        assert_eq!(parse(payload.as_bytes()), vec![TerminalCommand::Ignored]);
    }

    #[test]
    fn jexer_oversize_is_discarded() {
        let b64 = BASE64.encode([0_u8; 3]);
        let payload = format!("444;0;20000;1;0;{b64}");
        assert_eq!(parse(payload.as_bytes()), vec![TerminalCommand::Ignored]);
    }

    #[test]
    fn iterm_rejects_unprobed_payloads() {
        let b64 = BASE64.encode(b"definitely not an image");
        let payload = format!("1337;File=inline=1:{b64}");
        assert_eq!(parse(payload.as_bytes()), vec![TerminalCommand::Ignored]);
    }

    #[test]
    fn iterm_requires_inline() {
        let b64 = BASE64.encode(b"anything");
        let payload = format!("1337;File=name=Zm9v:{b64}");
        assert_eq!(parse(payload.as_bytes()), vec![TerminalCommand::Ignored]);
    }

    #[test]
    fn extent_forms() {
        assert_eq!(parse_extent("auto"), ImageExtent::Auto);
        assert_eq!(parse_extent("12"), ImageExtent::Cells(12));
        assert_eq!(parse_extent("300px"), ImageExtent::Pixels(300));
        assert_eq!(parse_extent("50%"), ImageExtent::Percent(50));
        assert_eq!(parse_extent("bogus"), ImageExtent::Auto);
    }
}
