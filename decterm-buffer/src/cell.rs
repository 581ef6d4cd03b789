// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use decterm_common::attributes::CellAttributes;

use crate::image_slice::ImageSlice;

/// One display position: a glyph, its attributes, and optionally an
/// image fragment composited over it. A codepoint of `'\0'` signals an
/// empty cell. Cells are value-like and cheap to copy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cell {
    codepoint: char,
    attrs: CellAttributes,
    image: Option<ImageSlice>,
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

impl Cell {
    #[must_use]
    pub const fn new(codepoint: char, attrs: CellAttributes) -> Self {
        Self {
            codepoint,
            attrs,
            image: None,
        }
    }

    /// A true blank: no glyph, default attributes.
    #[must_use]
    pub fn blank() -> Self {
        Self {
            codepoint: '\0',
            attrs: CellAttributes::default(),
            image: None,
        }
    }

    /// A back-color-erase blank: a space carrying the given attributes.
    #[must_use]
    pub const fn blank_with(attrs: CellAttributes) -> Self {
        Self {
            codepoint: ' ',
            attrs,
            image: None,
        }
    }

    #[must_use]
    pub const fn codepoint(&self) -> char {
        self.codepoint
    }

    /// The glyph as drawn; blanks render as spaces.
    #[must_use]
    pub const fn display_char(&self) -> char {
        if self.codepoint == '\0' {
            ' '
        } else {
            self.codepoint
        }
    }

    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.codepoint == '\0' || self.codepoint == ' '
    }

    #[must_use]
    pub const fn attributes(&self) -> &CellAttributes {
        &self.attrs
    }

    pub const fn attributes_mut(&mut self) -> &mut CellAttributes {
        &mut self.attrs
    }

    pub const fn set_char(&mut self, codepoint: char) {
        self.codepoint = codepoint;
    }

    pub const fn set_attributes(&mut self, attrs: CellAttributes) {
        self.attrs = attrs;
    }

    /// Copy every field from another cell.
    pub fn set_to(&mut self, other: &Self) {
        *self = other.clone();
    }

    #[must_use]
    pub const fn image(&self) -> Option<&ImageSlice> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, slice: ImageSlice) {
        self.image = Some(slice);
    }

    pub fn clear_image(&mut self) {
        self.image = None;
    }

    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image.is_some()
    }
}
