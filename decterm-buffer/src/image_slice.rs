// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use image::RgbaImage;
use std::sync::Arc;

/// Which part of a glyph-width pair this fragment occupies.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WidthRole {
    Left,
    Right,
    #[default]
    Center,
}

/// One cell's view into a shared bitmap: the bitmap itself plus the
/// pixel origin of this cell's rectangle within it.
#[derive(Clone, Debug)]
pub struct ImageSlice {
    bitmap: Arc<RgbaImage>,
    pub src_x: u32,
    pub src_y: u32,
    pub role: WidthRole,
}

impl ImageSlice {
    #[must_use]
    pub const fn new(bitmap: Arc<RgbaImage>, src_x: u32, src_y: u32) -> Self {
        Self {
            bitmap,
            src_x,
            src_y,
            role: WidthRole::Center,
        }
    }

    #[must_use]
    pub const fn with_role(mut self, role: WidthRole) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn bitmap(&self) -> &Arc<RgbaImage> {
        &self.bitmap
    }
}

// Slices compare by identity of the backing bitmap, not pixel contents;
// a terminal-full of fragments must stay cheap to diff.
impl PartialEq for ImageSlice {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.bitmap, &other.bitmap)
            && self.src_x == other.src_x
            && self.src_y == other.src_y
            && self.role == other.role
    }
}

impl Eq for ImageSlice {}
