// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Origin mode, scroll regions, DECCOLM, tabs, and mode boundaries.

mod common;

use common::{drain_output, feed, term, term_with_columns};
use decterm_common::device::DeviceType;

#[test]
fn origin_mode_pins_the_cursor_to_the_region() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1b[5;20r\x1b[?6h");

    // CUP(1;1) lands on the region top
    feed(&mut state, b"\x1b[1;1H");
    assert_eq!(state.cursor(), (0, 4));

    // the cursor cannot be addressed above or below the region
    feed(&mut state, b"\x1b[99;1H");
    assert_eq!(state.cursor().1, 19);

    feed(&mut state, b"\x1b[1;1HX");
    assert!(state.row_text(4).starts_with('X'));
}

#[test]
fn decstbm_homes_and_validates() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1b[10;10H\x1b[3;10r");
    assert_eq!(state.cursor(), (0, 0));
    assert_eq!(state.screen.scroll_region_top, 2);
    assert_eq!(state.screen.scroll_region_bottom, 9);

    // inverted margins are rejected and leave the region alone
    feed(&mut state, b"\x1b[15;4r");
    assert_eq!(state.screen.scroll_region_top, 2);
    assert_eq!(state.screen.scroll_region_bottom, 9);
}

#[test]
fn linefeed_scrolls_only_the_region() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1b[1;1Htop\x1b[2;5r");
    feed(&mut state, b"\x1b[2;1Hrow2\x1b[5;1Hrow5");

    // LF at the region bottom scrolls rows 2..=5 but not row 1
    feed(&mut state, b"\n");
    assert!(state.row_text(0).starts_with("top"));
    assert!(state.row_text(0).contains("top"));
    assert!(state.row_text(3).starts_with("row5"));
    assert_eq!(state.row_text(4).trim_end(), "");
    assert!(state.screen.geometry_ok());
}

#[test]
fn full_screen_linefeed_promotes_to_scrollback() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1b[1;1Hfirst");
    feed(&mut state, b"\x1b[24;1H\n");
    assert_eq!(state.screen.scrollback_len(), 1);
    let line = state.screen.scrollback_line(0).expect("scrollback line");
    assert!(line.text().starts_with("first"));
}

#[test]
fn scroll_up_covering_region_erases_it() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1b[1;5r\x1b[1;1HAAAA\x1b[99S");
    for row in 0..5 {
        assert_eq!(state.row_text(row).trim_end(), "");
    }
    assert!(state.screen.geometry_ok());
}

#[test]
fn deccolm_switches_width_and_resets() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1b[5;10r\x1b[8;8HX\x1b[?3h");
    assert_eq!(state.screen.width(), 132);
    assert_eq!(state.cursor(), (0, 0));
    assert_eq!(state.screen.scroll_region_top, 0);
    assert_eq!(state.screen.scroll_region_bottom, 23);
    assert_eq!(state.row_text(7).trim_end(), "");

    feed(&mut state, b"\x1b[?3l");
    assert_eq!(state.screen.width(), 80);
}

#[test]
fn deccolm_asks_the_listener_on_xterm() {
    let (mut state, _rx) = term_with_columns(DeviceType::Xterm, Some(100));
    feed(&mut state, b"\x1b[?3h");
    assert_eq!(state.screen.width(), 132);
    feed(&mut state, b"\x1b[?3l");
    assert_eq!(state.screen.width(), 100);
}

#[test]
fn tabs_default_set_and_clear() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\tX");
    assert_eq!(state.cursor(), (9, 0));
    assert_eq!(state.row_text(0).chars().nth(8), Some('X'));

    // HTS at column 11, then verify TAB honors it
    feed(&mut state, b"\x1b[1;12H\x1bH\x1b[1;1H\t\t");
    assert_eq!(state.cursor(), (11, 0));

    // TBC 3 clears everything; TAB runs to the right margin
    feed(&mut state, b"\x1b[3g\x1b[1;1H\t");
    assert_eq!(state.cursor(), (79, 0));
}

#[test]
fn mode_setting_is_idempotent() {
    let (mut state, _rx) = term(DeviceType::Xterm);
    feed(&mut state, b"\x1b[?6h\x1b[?6h");
    assert!(state.current.origin_mode);
    feed(&mut state, b"\x1b[?6l\x1b[?6l");
    assert!(!state.current.origin_mode);
}

#[test]
fn decrqm_reports_mode_state() {
    let (mut state, rx) = term(DeviceType::Xterm);
    feed(&mut state, b"\x1b[?7$p");
    assert_eq!(drain_output(&rx), b"\x1b[?7;1$y".to_vec());

    feed(&mut state, b"\x1b[?7l\x1b[?7$p");
    assert_eq!(drain_output(&rx), b"\x1b[?7;2$y".to_vec());

    // the fixed DECSDM polarity: set means no sixel scrolling
    feed(&mut state, b"\x1b[?80h\x1b[?80$p");
    assert_eq!(drain_output(&rx), b"\x1b[?80;1$y".to_vec());

    // unknown modes answer "not recognized"
    feed(&mut state, b"\x1b[?4242$p");
    assert_eq!(drain_output(&rx), b"\x1b[?4242;0$y".to_vec());
}

#[test]
fn insert_mode_shifts_the_tail() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"abc\x1b[1;1H\x1b[4hX");
    assert!(state.row_text(0).starts_with("Xabc"));
    feed(&mut state, b"\x1b[4l\x1b[1;1HY");
    assert!(state.row_text(0).starts_with("Yabc"));
}

#[test]
fn reverse_screen_flags_lines() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1b[?5h");
    assert!(state.screen.line(0).expect("line").reverse_video);
    feed(&mut state, b"\x1b[?5l");
    assert!(!state.screen.line(0).expect("line").reverse_video);
}

#[test]
fn vt52_submode_round_trip() {
    let (mut state, _rx) = term(DeviceType::Vt100);
    feed(&mut state, b"\x1b[?2l");
    assert!(state.scanner.is_vt52_mode());

    // VT52 direct cursor addressing and identify
    feed(&mut state, b"\x1bY%*X");
    assert_eq!(state.cursor(), (11, 5));
    assert!(state.row_text(5).chars().nth(10).is_some_and(|c| c == 'X'));

    feed(&mut state, b"\x1b<");
    assert!(!state.scanner.is_vt52_mode());
}

#[test]
fn double_width_halves_the_margin() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1b#6");
    assert!(state.screen.line(0).expect("line").double_width);
    feed(&mut state, b"\x1b[1;70H");
    assert_eq!(state.cursor(), (39, 0));

    // ED 2 clears the line flags again
    feed(&mut state, b"\x1b[2J");
    assert!(!state.screen.line(0).expect("line").double_width);
}

#[test]
fn ris_restores_documented_defaults() {
    let (mut state, _rx) = term(DeviceType::Xterm);
    feed(&mut state, b"\x1b[?6h\x1b[?25l\x1b[5;10r\x1b[1;31mhello\x1bc\x1b[2J");
    assert!(!state.current.origin_mode);
    assert!(state.modes.cursor_visible.is_visible());
    assert_eq!(state.screen.scroll_region_top, 0);
    assert_eq!(state.screen.scroll_region_bottom, 23);
    assert_eq!(state.current.attributes, Default::default());
    for row in 0..24 {
        assert_eq!(state.row_text(row).trim_end(), "");
    }
}
