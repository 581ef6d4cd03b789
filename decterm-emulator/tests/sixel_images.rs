// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sixel and inline images through the whole pipeline: DCS parsing,
//! decoding, and compositing onto cells.

mod common;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use common::{feed, term};
use decterm_common::device::DeviceType;

#[test]
fn sixel_composites_onto_cells() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    // a 6-pixel-tall column at the cursor
    feed(&mut state, b"\x1bPq#1~~~~~~~~\x1b\\");
    let line = state.screen.line(0).expect("row 0");
    assert!(line.is_image());
    let cell = line.char_at(0).expect("cell");
    assert!(cell.has_image());
}

#[test]
fn sixel_is_ignored_on_vt100() {
    let (mut state, _rx) = term(DeviceType::Vt100);
    feed(&mut state, b"\x1bPq#1~~~\x1b\\");
    assert!(!state.screen.line(0).expect("row 0").is_image());
}

#[test]
fn oversize_sixel_aborts_but_stream_continues() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1bPq\"1;1;9999;9999#1~\x1b\\after");
    assert!(!state.screen.line(0).expect("row 0").is_image());
    assert!(state.row_text(0).starts_with("after"));
}

#[test]
fn decsdm_parks_the_image_at_home() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    // fixed polarity: set disables sixel scrolling
    feed(&mut state, b"\x1b[?80h\x1b[5;5H");
    let before = state.cursor();
    feed(&mut state, b"\x1bPq#1~~\x1b\\");
    assert_eq!(state.cursor(), before);
    assert!(state.screen.line(0).expect("row 0").is_image());
}

#[test]
fn scrolling_sixel_advances_the_cursor() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1bPq#1~~\x1b\\");
    // cursor dropped below the one-cell-tall image
    assert_eq!(state.cursor().1, 1);
}

#[test]
fn shared_palette_persists_across_images() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1b[?1070h");
    // define register 9, then use it without redefining
    feed(&mut state, b"\x1bPq#9;2;100;0;0~\x1b\\");
    feed(&mut state, b"\x1b[1;1H\x1bPq#9~\x1b\\");
    let cell = state
        .screen
        .line(0)
        .and_then(|line| line.char_at(0))
        .cloned()
        .expect("cell");
    let image = cell.image().expect("image slice");
    assert_eq!(image.bitmap().get_pixel(0, 0).0, [255, 0, 0, 255]);
}

#[test]
fn jexer_rgb_image_lands_at_cursor() {
    let (mut state, _rx) = term(DeviceType::Xterm);
    // 8x16 red block = exactly one cell
    let rgb: Vec<u8> = std::iter::repeat([255_u8, 0, 0])
        .take(8 * 16)
        .flatten()
        .collect();
    let b64 = BASE64.encode(&rgb);
    let payload = format!("\x1b]444;0;8;16;0;{b64}\x1b\\");
    feed(&mut state, payload.as_bytes());

    let cell = state
        .screen
        .line(0)
        .and_then(|line| line.char_at(0))
        .cloned()
        .expect("cell");
    assert!(cell.has_image());
    // S=0 leaves the cursor in place
    assert_eq!(state.cursor(), (0, 0));
}

#[test]
fn jexer_scroll_variant_moves_the_cursor() {
    let (mut state, _rx) = term(DeviceType::Xterm);
    let rgb: Vec<u8> = std::iter::repeat([0_u8, 255, 0])
        .take(8 * 16)
        .flatten()
        .collect();
    let b64 = BASE64.encode(&rgb);
    let payload = format!("\x1b]444;0;8;16;1;{b64}\x1b\\");
    feed(&mut state, payload.as_bytes());
    assert_eq!(state.cursor().1, 1);
}

#[test]
fn malformed_image_payloads_are_dropped() {
    let (mut state, _rx) = term(DeviceType::Xterm);
    feed(&mut state, b"\x1b]444;0;4;4;1;!!!notbase64!!!\x1b\\ok");
    assert!(!state.screen.line(0).expect("row 0").is_image());
    assert!(state.row_text(0).starts_with("ok"));

    // iTerm payload that is not PNG/JPG is rejected after probing
    let b64 = BASE64.encode(b"plain text");
    let payload = format!("\x1b]1337;File=inline=1:{b64}\x1b\\ok2");
    feed(&mut state, payload.as_bytes());
    assert!(state.row_text(0).contains("ok2"));
}

#[test]
fn scrollback_images_age_out() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1bPq#1~~\x1b\\");
    assert!(state.screen.line(0).expect("row 0").is_image());

    // push well past three screens of scrollback
    for _ in 0..100 {
        feed(&mut state, b"\x1b[24;1H\n");
    }
    for idx in 0..state.screen.scrollback_len() {
        let line = state.screen.scrollback_line(idx).expect("line");
        let recent = state.screen.scrollback_len() - idx <= 3 * 24;
        if !recent {
            assert!(!line.is_image(), "stale scrollback line {idx} kept a bitmap");
        }
    }
}
