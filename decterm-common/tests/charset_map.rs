// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use decterm_common::charsets::{
    CharacterSet, CharsetState, GlLockShift, GrLockShift, SingleShift, map_codepoint, remap,
};
use proptest::prelude::*;

#[test]
fn national_replacements() {
    // the classic NRCS spot checks
    assert_eq!(remap(CharacterSet::German, b'['), 'Ä');
    assert_eq!(remap(CharacterSet::German, b'~'), 'ß');
    assert_eq!(remap(CharacterSet::French, b'{'), 'é');
    assert_eq!(remap(CharacterSet::Swedish, b'@'), 'É');
    assert_eq!(remap(CharacterSet::Spanish, b'\\'), 'Ñ');
    assert_eq!(remap(CharacterSet::NorwegianDanish, b'|'), 'ø');
    assert_eq!(remap(CharacterSet::Uk, b'#'), '£');
}

#[test]
fn supplemental_tracks_latin1_with_dec_differences() {
    // 0xE9 -> é (same as Latin-1)
    assert_eq!(remap(CharacterSet::DecSupplemental, 0x69), 'é');
    // DEC multinational puts the currency sign where Latin-1 has ¨
    assert_eq!(remap(CharacterSet::DecSupplemental, 0x28), '¤');
    assert_eq!(remap(CharacterSet::DecSupplemental, 0x5D), 'Ÿ');
}

proptest! {
    // the selection rule is total: every codepoint and every selection
    // state yields a defined scalar value
    #[test]
    fn map_is_total(
        cp in 0_u32..0x11_0000,
        vt52 in any::<bool>(),
        shift_out in any::<bool>(),
        gl_shift in 0_u8..3,
        gr_shift in 0_u8..4,
        ss in 0_u8..3,
    ) {
        prop_assume!(cp < 0xD800 || cp > 0xDFFF);
        let state = CharsetState {
            g0: CharacterSet::DecSpecialGraphics,
            g1: CharacterSet::German,
            g2: CharacterSet::Uk,
            g3: CharacterSet::Finnish,
            gr: CharacterSet::DecSupplemental,
            shift_out,
            lockshift_gl: match gl_shift {
                0 => GlLockShift::Default,
                1 => GlLockShift::G2,
                _ => GlLockShift::G3,
            },
            lockshift_gr: match gr_shift {
                0 => GrLockShift::Default,
                1 => GrLockShift::G1,
                2 => GrLockShift::G2,
                _ => GrLockShift::G3,
            },
            singleshift: match ss {
                0 => SingleShift::None,
                1 => SingleShift::Ss2,
                _ => SingleShift::Ss3,
            },
        };
        let mapped = map_codepoint(cp, vt52, &state);
        prop_assert!(u32::from(mapped) <= 0x10_FFFF);
    }
}
