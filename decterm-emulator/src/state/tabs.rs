// Copyright (C) 2024-2025 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeSet;

/// The ordered tab-stop set. Reset places a stop at every 8th column.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TabStops {
    stops: BTreeSet<usize>,
}

impl TabStops {
    #[must_use]
    pub fn with_default_stops(width: usize) -> Self {
        let mut tabs = Self::default();
        tabs.reset(width);
        tabs
    }

    pub fn reset(&mut self, width: usize) {
        self.stops = (0..width).step_by(8).collect();
    }

    /// HTS at the given column.
    pub fn set(&mut self, col: usize) {
        self.stops.insert(col);
    }

    /// TBC 0.
    pub fn clear_at(&mut self, col: usize) {
        self.stops.remove(&col);
    }

    /// TBC 3.
    pub fn clear_all(&mut self) {
        self.stops.clear();
    }

    /// The first stop strictly right of `col`, or the right margin when
    /// none exists.
    #[must_use]
    pub fn next_stop(&self, col: usize, right_margin: usize) -> usize {
        self.stops
            .range(col + 1..=right_margin)
            .next()
            .copied()
            .unwrap_or(right_margin)
    }
}
