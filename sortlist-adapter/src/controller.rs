use sortlist::{
    DataSource, EmptyState, GroupingMode, HeightCache, ItemId, ListLayout, ListOptions, Projection,
    Rect, WindowCalculator, WindowRange,
};

use crate::{
    DropOutcome, ReorderEngine, ReorderState, ScrollPositionStore, ScrollState, SelectionControl,
    StructureTarget, ViewportProvider,
};

/// What the host should render for the current scroll position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Content {
    /// Realize these rows (a windowed range for preview lists, every row otherwise).
    Rows(WindowRange),
    /// The list has no rows; render the fixed empty-state block.
    Empty(EmptyState),
}

impl Content {
    pub fn range(&self) -> Option<WindowRange> {
        match self {
            Self::Rows(r) => Some(*r),
            Self::Empty(_) => None,
        }
    }
}

/// Result of a re-layout: the content to render and the scroll offset to apply to the
/// scroll container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Relayout {
    pub content: Content,
    pub scroll_offset: u64,
}

/// A framework-neutral controller for one mounted list instance.
///
/// It owns the projection, the height cache, the window prefix sums, the saved scroll
/// position and the reorder engine. It holds no UI objects; the host drives it:
/// - `reload` whenever the data source changes
/// - `sync_viewport` / `on_scroll` when the scroll container reports events
/// - `on_measure` once a realized row has been laid out
/// - `on_rows_rendered` after each render pass (load-more hook)
/// - `drag_start` / `drag_end` / `drag_cancel` from its gesture layer
pub struct ListController<D, C: SelectionControl + Clone> {
    options: ListOptions,
    grouping: GroupingMode<D>,
    projection: Projection<D>,
    heights: HeightCache,
    window: WindowCalculator,
    scroll: ScrollPositionStore,
    reorder: ReorderEngine<C>,
    viewport: Rect,
    scroll_offset: u64,
    requested_at: Option<usize>,
}

impl<D, C: SelectionControl + Clone> ListController<D, C> {
    /// Creates an empty list. Call [`Self::reload`] to populate it.
    pub fn mount(options: ListOptions, grouping: GroupingMode<D>, selection: C) -> Self {
        ldebug!(
            layout = ?options.layout,
            is_preview = options.is_preview,
            orderable = options.orderable,
            "ListController::mount"
        );
        Self {
            heights: HeightCache::new(options.heights, options.is_compact()),
            reorder: ReorderEngine::new(selection, options.orderable),
            options,
            grouping,
            projection: Projection::empty(),
            window: WindowCalculator::new(),
            scroll: ScrollPositionStore::new(),
            viewport: Rect::default(),
            scroll_offset: 0,
            requested_at: None,
        }
    }

    /// Like [`Self::mount`], but resumes from a scroll position saved by a previous instance.
    pub fn mount_with_scroll(
        options: ListOptions,
        grouping: GroupingMode<D>,
        selection: C,
        state: ScrollState,
    ) -> Self {
        let mut list = Self::mount(options, grouping, selection);
        list.scroll = ScrollPositionStore::from_state(state);
        list
    }

    /// Tears the instance down and hands back its saved scroll position.
    ///
    /// An in-flight drag is abandoned; selection suppression is released with it.
    pub fn unmount(self) -> ScrollState {
        ldebug!(offset = self.scroll.restore(), "ListController::unmount");
        self.scroll.state()
    }

    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    pub fn projection(&self) -> &Projection<D> {
        &self.projection
    }

    pub fn heights(&self) -> &HeightCache {
        &self.heights
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    pub fn saved_scroll(&self) -> ScrollState {
        self.scroll.state()
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn total_extent(&self) -> u64 {
        self.window.total_extent()
    }

    /// Number of records currently loaded from the source.
    pub fn loaded(&self) -> usize {
        self.projection.canonical().len()
    }

    pub fn reorder_state(&self) -> ReorderState {
        self.reorder.state()
    }

    /// Rebuilds the projection from `source`, then re-lays out.
    pub fn reload<S>(&mut self, source: &S) -> Relayout
    where
        S: DataSource<Detail = D> + ?Sized,
    {
        self.projection =
            Projection::from_source(source, &self.grouping, self.options.is_preview);
        self.relayout()
    }

    /// Re-syncs estimates with the current sequence, rebuilds the prefix sums and restores the
    /// saved scroll offset.
    pub fn relayout(&mut self) -> Relayout {
        let display = self.projection.display();
        self.heights.sync(display);
        self.window.rebuild(display, &self.heights);
        self.scroll_offset = self
            .window
            .clamp_scroll_offset(self.scroll.restore(), self.viewport.height);
        ltrace!(
            rows = self.window.len(),
            scroll_offset = self.scroll_offset,
            "ListController::relayout"
        );
        Relayout {
            content: self.content(),
            scroll_offset: self.scroll_offset,
        }
    }

    /// Pulls the current scroll container size from `provider` and reapplies the saved scroll
    /// offset, clamped to the new size.
    pub fn sync_viewport<P>(&mut self, provider: &P) -> Content
    where
        P: ViewportProvider + ?Sized,
    {
        self.viewport = provider.viewport();
        self.scroll_offset = self
            .window
            .clamp_scroll_offset(self.scroll.restore(), self.viewport.height);
        self.content()
    }

    /// Records an observed scroll offset and returns the content for it.
    pub fn on_scroll(&mut self, offset: u64) -> Content {
        self.scroll.save(offset);
        self.scroll_offset = self
            .window
            .clamp_scroll_offset(offset, self.viewport.height);
        self.content()
    }

    /// Records the laid-out height of a realized row.
    ///
    /// Returns `true` if the height changed. Measurements for rows that are no longer in the
    /// sequence are discarded.
    pub fn on_measure(&mut self, id: &ItemId, height: u32) -> bool {
        let changed = match self.heights.record(id, height) {
            Ok(changed) => changed,
            Err(_err) => {
                ldebug!(error = %_err, "ListController::on_measure: discarded");
                return false;
            }
        };
        if !changed {
            return false;
        }
        if let Some(index) = self.projection.display_index_of(id) {
            self.window.set_height(index, height);
            ltrace!(index, height, "ListController::on_measure");
        }
        true
    }

    /// Applies measurements exported from an earlier instance. Returns how many were applied.
    pub fn import_measurements(
        &mut self,
        entries: impl IntoIterator<Item = (ItemId, u32)>,
    ) -> usize {
        let applied = self.heights.import_measurements(entries);
        if applied > 0 {
            self.window.rebuild(self.projection.display(), &self.heights);
        }
        applied
    }

    /// Content for the current scroll offset and viewport.
    pub fn content(&self) -> Content {
        let range = if self.options.is_preview {
            self.window.compute(
                self.scroll_offset,
                self.viewport.height,
                self.options.overscan,
            )
        } else {
            self.window.full_range()
        };
        match range {
            Some(range) => Content::Rows(range),
            None => Content::Empty(self.options.empty_state),
        }
    }

    /// Load-more hook, called after a render pass.
    ///
    /// Asks `source` for more records when fewer than `load_more_threshold` loaded records
    /// remain below the last visible row and the source has more. Label rows are not counted.
    /// Each loaded count is requested at most once. Returns `true` if a request was made.
    pub fn on_rows_rendered<S>(&mut self, source: &S) -> bool
    where
        S: DataSource<Detail = D> + ?Sized,
    {
        let loaded = self.loaded();
        if source.total_count() <= loaded || self.requested_at == Some(loaded) {
            return false;
        }
        let rows = self.projection.display().items();
        let visible_to = match self.content() {
            Content::Rows(range) => range.visible_end + 1,
            Content::Empty(_) => 0,
        };
        let remaining = rows[visible_to.min(rows.len())..]
            .iter()
            .filter(|item| item.is_record())
            .count();
        if remaining > self.options.load_more_threshold {
            return false;
        }
        ldebug!(loaded, total = source.total_count(), "ListController: load more");
        self.requested_at = Some(loaded);
        source.load_more(loaded);
        true
    }

    /// Switches layout. Height formulas change, so every measurement is dropped.
    pub fn set_layout(&mut self, layout: ListLayout) -> Relayout {
        self.options.layout = layout;
        self.heights.set_compact(layout.is_compact());
        self.relayout()
    }

    /// Switches grouping mode and rebuilds the projection from `source`.
    pub fn set_grouping<S>(&mut self, grouping: GroupingMode<D>, source: &S) -> Relayout
    where
        S: DataSource<Detail = D> + ?Sized,
    {
        self.grouping = grouping;
        self.heights.invalidate_all();
        self.reload(source)
    }

    /// Scrolls row `index` into view with the configured alignment and returns the applied
    /// offset.
    pub fn scroll_to_index(&mut self, index: usize) -> u64 {
        let offset = self.window.scroll_to_index_offset(
            index,
            self.options.scroll_alignment,
            self.scroll_offset,
            self.viewport.height,
        );
        self.scroll.save(offset);
        self.scroll_offset = offset;
        offset
    }

    pub fn drag_start(&mut self, source: ItemId) {
        self.reorder.drag_start(source);
    }

    /// Interrupts an in-flight drag (focus loss, escape, external event).
    pub fn drag_cancel(&mut self) -> DropOutcome {
        self.reorder.cancel()
    }

    /// Ends a drag over `target` and emits the move into `structure` on success.
    ///
    /// After a commit the rows between source and target have new neighbours, so their
    /// measurements are dropped and the list re-lays out.
    pub fn drag_end<T>(&mut self, target: Option<&ItemId>, structure: &mut T) -> DropOutcome
    where
        T: StructureTarget + ?Sized,
    {
        let outcome = self.reorder.drag_end(target, &self.projection, structure);
        if let Some(commit) = outcome.commit() {
            let lo = commit.source_index.min(commit.target_index);
            let hi = commit.source_index.max(commit.target_index);
            for item in self.projection.display().items().iter().take(hi + 1).skip(lo) {
                self.heights.invalidate(&item.id);
            }
            self.relayout();
        }
        outcome
    }
}

impl<D, C: SelectionControl + Clone> core::fmt::Debug for ListController<D, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListController")
            .field("options", &self.options)
            .field("rows", &self.projection.len())
            .field("scroll_offset", &self.scroll_offset)
            .field("viewport", &self.viewport)
            .field("reorder", &self.reorder)
            .finish_non_exhaustive()
    }
}
