// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! DECSC/DECRC round-trips over the full saveable record.

mod common;

use common::{feed, term};
use decterm_common::{
    charsets::{CharacterSet, GlLockShift},
    colors::TerminalColor,
    device::DeviceType,
};

#[test]
fn decsc_decrc_restores_the_saved_subset() {
    let (mut state, _rx) = term(DeviceType::Vt220);

    // build a distinctive saveable state: cursor, attrs, charsets,
    // origin mode, autowrap
    feed(&mut state, b"\x1b[5;20r\x1b[?6h");
    feed(&mut state, b"\x1b[2;3H\x1b[1;4;31m\x1b(0\x1bn\x1b[?7l");
    let saved_cursor = state.cursor();
    let saved_attrs = state.current.attributes;
    let saved_charsets = state.current.charsets;

    feed(&mut state, b"\x1b7");

    // trash everything
    feed(&mut state, b"\x1b[?7h\x1b[0m\x1b(B\x1bo\x1b[10;1Hgarbage\x1b[?6l");
    assert_ne!(state.cursor(), saved_cursor);

    feed(&mut state, b"\x1b8");

    assert_eq!(state.cursor(), saved_cursor);
    assert_eq!(state.current.attributes, saved_attrs);
    assert_eq!(state.current.charsets, saved_charsets);
    assert!(state.current.origin_mode);
    assert!(!state.current.line_wrap);
    assert_eq!(state.current.charsets.g0, CharacterSet::DecSpecialGraphics);
    assert_eq!(state.current.charsets.lockshift_gl, GlLockShift::G2);
}

#[test]
fn restore_without_save_goes_home() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1b[12;40Hxyz\x1b8");
    assert_eq!(state.cursor(), (0, 0));
    assert_eq!(state.current.attributes, Default::default());
}

#[test]
fn csi_forms_mirror_esc_forms() {
    let (mut state, _rx) = term(DeviceType::Xterm);
    feed(&mut state, b"\x1b[6;7H\x1b[s\x1b[20;20H\x1b[u");
    assert_eq!(state.cursor(), (6, 5));
}

#[test]
fn saved_attributes_include_protection() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1b[1\"q\x1b7\x1b[0\"q\x1b8");
    assert!(state.current.attributes.protected);
}

#[test]
fn sgr_extended_colors_survive_the_round_trip() {
    let (mut state, _rx) = term(DeviceType::Xterm);
    feed(&mut state, b"\x1b[38;2;1;2;3m\x1b[48;5;100m\x1b7\x1b[0m\x1b8");
    assert_eq!(
        state.current.attributes.foreground,
        TerminalColor::Rgb(1, 2, 3)
    );
    assert_eq!(
        state.current.attributes.background,
        TerminalColor::Palette(100)
    );
}
