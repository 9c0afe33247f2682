use crate::{Align, ItemKind};

/// Fixed row heights used until a real measurement is recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeightPolicy {
    /// Record row height in list mode.
    pub record: u32,
    /// Record row height in compact mode.
    pub record_compact: u32,
    /// Group-label row height at the top of the sequence.
    pub label: u32,
    /// Leading margin added to every group label that is not the first row.
    pub label_margin: u32,
}

impl HeightPolicy {
    /// Estimated height of a row of `kind` at display `index`.
    pub fn estimate<D>(&self, kind: &ItemKind<D>, index: usize, is_compact: bool) -> u32 {
        match kind {
            ItemKind::GroupLabel { .. } => self.label_height(index),
            ItemKind::Record(_) => self.record_height(is_compact),
        }
    }

    pub fn label_height(&self, index: usize) -> u32 {
        if index == 0 {
            self.label
        } else {
            self.label.saturating_add(self.label_margin)
        }
    }

    pub fn record_height(&self, is_compact: bool) -> u32 {
        if is_compact {
            self.record_compact
        } else {
            self.record
        }
    }
}

impl Default for HeightPolicy {
    fn default() -> Self {
        Self {
            record: 64,
            record_compact: 28,
            label: 28,
            label_margin: 12,
        }
    }
}

/// Layout of the widget hosting the list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ListLayout {
    #[default]
    List,
    Compact,
    View,
}

impl ListLayout {
    pub fn is_compact(self) -> bool {
        matches!(self, Self::Compact | Self::View)
    }
}

/// Fixed-size block rendered in place of a window when the list has no rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmptyState {
    pub content: u32,
    pub padding_top: u32,
    pub padding_bottom: u32,
}

impl EmptyState {
    pub fn height(&self) -> u32 {
        self.content
            .saturating_add(self.padding_top)
            .saturating_add(self.padding_bottom)
    }
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            content: 36,
            padding_top: 20,
            padding_bottom: 22,
        }
    }
}

/// Configuration for one list instance.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListOptions {
    /// Rows realized beyond each edge of the visible range.
    pub overscan: usize,
    /// Distance (in rows) from the end of the loaded records at which more data is requested.
    pub load_more_threshold: usize,
    pub heights: HeightPolicy,
    pub layout: ListLayout,
    /// Preview lists are windowed and may carry group labels; other lists render every row.
    pub is_preview: bool,
    /// Whether the backing collection is the one designated as user-orderable.
    pub orderable: bool,
    pub empty_state: EmptyState,
    /// Alignment used by programmatic scroll-to-row.
    pub scroll_alignment: Align,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            overscan: 30,
            load_more_threshold: 30,
            heights: HeightPolicy::default(),
            layout: ListLayout::List,
            is_preview: false,
            orderable: false,
            empty_state: EmptyState::default(),
            scroll_alignment: Align::Center,
        }
    }
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_compact(&self) -> bool {
        self.layout.is_compact()
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_load_more_threshold(mut self, threshold: usize) -> Self {
        self.load_more_threshold = threshold;
        self
    }

    pub fn with_heights(mut self, heights: HeightPolicy) -> Self {
        self.heights = heights;
        self
    }

    pub fn with_layout(mut self, layout: ListLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_preview(mut self, is_preview: bool) -> Self {
        self.is_preview = is_preview;
        self
    }

    pub fn with_orderable(mut self, orderable: bool) -> Self {
        self.orderable = orderable;
        self
    }

    pub fn with_empty_state(mut self, empty_state: EmptyState) -> Self {
        self.empty_state = empty_state;
        self
    }

    pub fn with_scroll_alignment(mut self, align: Align) -> Self {
        self.scroll_alignment = align;
        self
    }
}
