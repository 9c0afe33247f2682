use alloc::vec::Vec;
use core::cmp;
use core::ops::RangeInclusive;

use crate::fenwick::Fenwick;
use crate::{Align, DisplaySequence, HeightCache};

/// The rows that must be realized for one scroll position.
///
/// Derived on demand; never kept past the render pass that asked for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowRange {
    /// First realized row (overscan included).
    pub start_index: usize,
    /// Last realized row, inclusive (overscan included).
    pub end_index: usize,
    /// First row intersecting the viewport.
    pub visible_start: usize,
    /// Last row intersecting the viewport, inclusive.
    pub visible_end: usize,
    /// Sum of all row heights.
    pub total_extent: u64,
}

impl WindowRange {
    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start_index..=self.end_index
    }

    pub fn row_count(&self) -> usize {
        self.end_index - self.start_index + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices().contains(&index)
    }
}

/// Offset → row lookups over the heights of a display sequence.
///
/// `rebuild` walks the whole sequence (`O(n)`), which is fine for lists of a few thousand
/// rows; past that the rebuild on every sequence change becomes the bottleneck. Single
/// measurements are applied with `set_height` in `O(log n)`.
#[derive(Clone, Debug, Default)]
pub struct WindowCalculator {
    heights: Vec<u32>,
    sums: Fenwick,
}

impl WindowCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sequence<D>(sequence: &DisplaySequence<D>, cache: &HeightCache) -> Self {
        let mut calc = Self::new();
        calc.rebuild(sequence, cache);
        calc
    }

    pub fn rebuild<D>(&mut self, sequence: &DisplaySequence<D>, cache: &HeightCache) {
        self.heights.clear();
        self.heights.reserve_exact(sequence.len());
        self.heights.extend(
            sequence
                .iter()
                .enumerate()
                .map(|(i, item)| cache.height_of(item, i)),
        );
        self.sums = Fenwick::from_heights(&self.heights);
        ltrace!(
            rows = self.heights.len(),
            total = self.sums.total(),
            "WindowCalculator::rebuild"
        );
    }

    pub fn len(&self) -> usize {
        self.heights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Updates the height of one row and returns the applied delta.
    pub fn set_height(&mut self, index: usize, height: u32) -> i64 {
        let Some(cur) = self.heights.get_mut(index) else {
            return 0;
        };
        let delta = height as i64 - *cur as i64;
        *cur = height;
        self.sums.add(index, delta);
        delta
    }

    pub fn total_extent(&self) -> u64 {
        self.sums.total()
    }

    pub fn item_start(&self, index: usize) -> Option<u64> {
        (index < self.len()).then(|| self.sums.prefix_sum(index))
    }

    pub fn item_height(&self, index: usize) -> Option<u32> {
        self.heights.get(index).copied()
    }

    pub fn item_end(&self, index: usize) -> Option<u64> {
        let start = self.item_start(index)?;
        Some(start.saturating_add(self.item_height(index)? as u64))
    }

    /// Row under `offset`, clamped to the last row.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        let last = self.len().checked_sub(1)?;
        Some(self.sums.lower_bound(offset).min(last))
    }

    pub fn max_scroll_offset(&self, viewport_height: u32) -> u64 {
        self.total_extent().saturating_sub(viewport_height as u64)
    }

    pub fn clamp_scroll_offset(&self, offset: u64, viewport_height: u32) -> u64 {
        offset.min(self.max_scroll_offset(viewport_height))
    }

    /// Computes the realized window for a scroll position.
    ///
    /// Returns `None` for an empty sequence; callers render the empty-state block instead.
    pub fn compute(
        &self,
        scroll_offset: u64,
        viewport_height: u32,
        overscan: usize,
    ) -> Option<WindowRange> {
        let last = self.len().checked_sub(1)?;
        let scroll_offset = self.clamp_scroll_offset(scroll_offset, viewport_height);

        let visible_start = self.sums.lower_bound(scroll_offset).min(last);
        let visible_end = if viewport_height == 0 {
            visible_start
        } else {
            let end_inclusive = scroll_offset.saturating_add(viewport_height as u64 - 1);
            cmp::max(self.sums.lower_bound(end_inclusive).min(last), visible_start)
        };

        let range = WindowRange {
            start_index: visible_start.saturating_sub(overscan),
            end_index: cmp::min(last, visible_end.saturating_add(overscan)),
            visible_start,
            visible_end,
            total_extent: self.total_extent(),
        };
        ltrace!(
            scroll_offset,
            viewport_height,
            start = range.start_index,
            end = range.end_index,
            "WindowCalculator::compute"
        );
        Some(range)
    }

    /// A window covering every row, for lists that are not virtualized.
    pub fn full_range(&self) -> Option<WindowRange> {
        let last = self.len().checked_sub(1)?;
        Some(WindowRange {
            start_index: 0,
            end_index: last,
            visible_start: 0,
            visible_end: last,
            total_extent: self.total_extent(),
        })
    }

    /// Scroll offset that brings row `index` into view with `align`, clamped.
    pub fn scroll_to_index_offset(
        &self,
        index: usize,
        align: Align,
        scroll_offset: u64,
        viewport_height: u32,
    ) -> u64 {
        let Some(last) = self.len().checked_sub(1) else {
            return 0;
        };
        let index = index.min(last);
        let start = self.sums.prefix_sum(index);
        let size = self.heights[index] as u64;
        let end = start.saturating_add(size);
        let view = viewport_height as u64;

        let target = match align {
            Align::Start => start,
            Align::End => end.saturating_sub(view),
            Align::Center => start.saturating_add(size / 2).saturating_sub(view / 2),
            Align::Auto => {
                let cur_end = scroll_offset.saturating_add(view);
                if start >= scroll_offset && end <= cur_end {
                    scroll_offset
                } else if start < scroll_offset {
                    start
                } else {
                    end.saturating_sub(view)
                }
            }
        };

        self.clamp_scroll_offset(target, viewport_height)
    }
}

/// One-shot form of [`WindowCalculator::compute`]: builds the prefix sums for `sequence` and
/// computes the window in a single `O(n)` pass.
pub fn compute_window<D>(
    sequence: &DisplaySequence<D>,
    cache: &HeightCache,
    scroll_offset: u64,
    viewport_height: u32,
    overscan: usize,
) -> Option<WindowRange> {
    WindowCalculator::from_sequence(sequence, cache).compute(
        scroll_offset,
        viewport_height,
        overscan,
    )
}
