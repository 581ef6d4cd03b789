// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Malformed input must never corrupt prior cells or the geometry.

mod common;

use common::{feed, term};
use decterm_common::device::DeviceType;
use proptest::prelude::*;

#[test]
fn malformed_csi_is_dropped_silently() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    // colons route to CSI_IGNORE; the sequences vanish whole
    feed(&mut state, b"keep\x1b[12:34m\x1b[2:15H");
    assert_eq!(state.row_text(0).trim_end(), "keep");
    assert!(state.screen.geometry_ok());
}

#[test]
fn unterminated_osc_aborted_by_escape() {
    let (mut state, _rx) = term(DeviceType::Xterm);
    feed(&mut state, b"\x1b]0;half a title\x1b[31mred");
    // the OSC died; the CSI that interrupted it still applied
    assert!(state.title().is_empty());
    assert!(state.row_text(0).starts_with("red"));
}

#[test]
fn cancel_and_substitute_abort_sequences() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x1b[12\x18ok");
    assert!(state.row_text(0).starts_with("ok"));

    feed(&mut state, b"\x1b[1;1H\x1b]0;title\x1aover");
    assert!(state.row_text(0).starts_with("over"));
    assert!(state.title().is_empty());
}

#[test]
fn del_inside_sequences_is_harmless() {
    let (mut state, _rx) = term(DeviceType::Vt220);
    feed(&mut state, b"\x7fAB\x7fC");
    assert!(state.row_text(0).starts_with("ABC"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // arbitrary byte soup: the consume path is total and the geometry
    // invariants hold after every chunk
    #[test]
    fn byte_soup_never_breaks_geometry(chunks in prop::collection::vec(
        prop::collection::vec(any::<u8>(), 0..512),
        1..8,
    )) {
        let (mut state, _rx) = term(DeviceType::Vt220);
        for chunk in &chunks {
            feed(&mut state, chunk);
            prop_assert!(state.screen.geometry_ok());
            let (x, y) = state.cursor();
            prop_assert!(y < 24);
            prop_assert!(x < 80 || state.screen.line(y).is_some_and(|l| l.double_width));
        }
    }

    #[test]
    fn ascii_soup_on_xterm(chunks in prop::collection::vec(
        prop::collection::vec(any::<u8>(), 0..256),
        1..4,
    )) {
        let (mut state, _rx) = term(DeviceType::Xterm);
        for chunk in &chunks {
            feed(&mut state, chunk);
        }
        prop_assert!(state.screen.geometry_ok());
    }
}
