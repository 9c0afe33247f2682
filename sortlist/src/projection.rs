use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use crate::key::IdMap;
use crate::{DataSource, Item, ItemId, ListError};

/// Assigns each record to a named group. Consecutive records with the same group share one
/// label row.
pub type GroupKeyFn<D> = Arc<dyn Fn(&ItemId, &D) -> String + Send + Sync>;

/// How the display sequence is derived from the canonical order.
pub enum GroupingMode<D> {
    /// Canonical order, one row per record.
    Flat,
    /// A group-label row before the first member of each group (preview lists only).
    Labeled(GroupKeyFn<D>),
}

impl<D> GroupingMode<D> {
    pub fn labeled(group_of: impl Fn(&ItemId, &D) -> String + Send + Sync + 'static) -> Self {
        Self::Labeled(Arc::new(group_of))
    }

    pub fn is_labeled(&self) -> bool {
        matches!(self, Self::Labeled(_))
    }
}

impl<D> Clone for GroupingMode<D> {
    fn clone(&self) -> Self {
        match self {
            Self::Flat => Self::Flat,
            Self::Labeled(f) => Self::Labeled(Arc::clone(f)),
        }
    }
}

impl<D> Default for GroupingMode<D> {
    fn default() -> Self {
        Self::Flat
    }
}

impl<D> fmt::Debug for GroupingMode<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat => f.write_str("Flat"),
            Self::Labeled(_) => f.write_str("Labeled(..)"),
        }
    }
}

/// The rows as currently shown, group labels included. Ids are unique.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplaySequence<D> {
    items: Vec<Item<D>>,
}

impl<D> DisplaySequence<D> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Wraps `items`, dropping any later item whose id was already seen.
    pub fn from_items(items: impl IntoIterator<Item = Item<D>>) -> Self {
        let mut seen = IdMap::<()>::default();
        let mut out = Vec::new();
        for item in items {
            if seen.insert(item.id.clone(), ()).is_some() {
                lwarn!(id = %item.id, "DisplaySequence: duplicate id dropped");
                continue;
            }
            out.push(item);
        }
        Self { items: out }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item<D>> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item<D>] {
        &self.items
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Item<D>> {
        self.items.iter()
    }

    /// Linear scan; prefer [`Projection::display_index_of`] for repeated lookups.
    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|it| &it.id == id)
    }
}

impl<D> Default for DisplaySequence<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, D> IntoIterator for &'a DisplaySequence<D> {
    type Item = &'a Item<D>;
    type IntoIter = core::slice::Iter<'a, Item<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Builds the display sequence for `canonical`.
///
/// Records whose details cannot be looked up are omitted. Group labels are only inserted for
/// preview lists with [`GroupingMode::Labeled`]; the output depends on nothing but the inputs
/// and their order.
///
/// A label is `label:<group>`, or `label:<group>#<n>` for later runs of the same group. The
/// suffix is bumped past any id already used by a record or another label.
pub fn build_display_sequence<D>(
    canonical: &[ItemId],
    mut lookup: impl FnMut(&ItemId) -> Result<D, ListError>,
    grouping: &GroupingMode<D>,
    is_preview: bool,
) -> DisplaySequence<D> {
    let group_of = match grouping {
        GroupingMode::Labeled(f) if is_preview => Some(f),
        _ => None,
    };

    let mut items = Vec::with_capacity(canonical.len());
    let mut seen = IdMap::<()>::default();
    let mut current_group: Option<String> = None;
    let mut runs = BTreeMap::<String, usize>::new();
    // Label ids must not collide with any record id or with each other.
    let mut taken = IdMap::<()>::default();
    if group_of.is_some() {
        for id in canonical {
            taken.insert(id.clone(), ());
        }
    }

    for id in canonical {
        if seen.contains_key(id) {
            lwarn!(id = %id, "build_display_sequence: duplicate canonical id skipped");
            continue;
        }
        let Ok(detail) = lookup(id) else {
            ldebug!(id = %id, "build_display_sequence: omitting row without details");
            continue;
        };

        if let Some(group_of) = group_of {
            let group = group_of(id, &detail);
            if current_group.as_deref() != Some(group.as_str()) {
                let run = runs.entry(group.clone()).or_insert(0);
                let label_id = loop {
                    let candidate = if *run == 0 {
                        ItemId::new(format!("label:{group}"))
                    } else {
                        ItemId::new(format!("label:{group}#{run}"))
                    };
                    *run += 1;
                    if !taken.contains_key(&candidate) {
                        break candidate;
                    }
                };
                taken.insert(label_id.clone(), ());
                items.push(Item::group_label(label_id, group.clone()));
                current_group = Some(group);
            }
        }

        seen.insert(id.clone(), ());
        items.push(Item::record(id.clone(), detail));
    }

    DisplaySequence { items }
}

/// Maps a display index to the position of the same record in `canonical`.
pub fn display_index_to_canonical<D>(
    display: &DisplaySequence<D>,
    canonical: &[ItemId],
    index: usize,
) -> Result<usize, ListError> {
    let item = display.get(index).ok_or(ListError::IndexOutOfBounds {
        index,
        len: display.len(),
    })?;
    if !item.is_record() {
        return Err(ListError::NotARecord { index });
    }
    canonical
        .iter()
        .position(|id| id == &item.id)
        .ok_or_else(|| ListError::NotFound {
            id: item.id.clone(),
        })
}

/// A display sequence together with the canonical order it was derived from, with indexed
/// lookups in both directions.
#[derive(Clone, Debug)]
pub struct Projection<D> {
    display: DisplaySequence<D>,
    canonical: Vec<ItemId>,
    canonical_positions: IdMap<usize>,
    display_positions: IdMap<usize>,
}

impl<D> Projection<D> {
    pub fn build(
        canonical: Vec<ItemId>,
        lookup: impl FnMut(&ItemId) -> Result<D, ListError>,
        grouping: &GroupingMode<D>,
        is_preview: bool,
    ) -> Self {
        let display = build_display_sequence(&canonical, lookup, grouping, is_preview);

        let mut canonical_positions = IdMap::default();
        for (i, id) in canonical.iter().enumerate() {
            canonical_positions.entry(id.clone()).or_insert(i);
        }
        let mut display_positions = IdMap::default();
        for (i, item) in display.iter().enumerate() {
            display_positions.insert(item.id.clone(), i);
        }

        ldebug!(
            canonical = canonical.len(),
            display = display.len(),
            labeled = grouping.is_labeled(),
            is_preview,
            "Projection::build"
        );

        Self {
            display,
            canonical,
            canonical_positions,
            display_positions,
        }
    }

    /// Builds from the records a data source currently holds.
    pub fn from_source<S>(source: &S, grouping: &GroupingMode<D>, is_preview: bool) -> Self
    where
        S: DataSource<Detail = D> + ?Sized,
    {
        Self::build(
            source.record_ids(),
            |id| source.details(id),
            grouping,
            is_preview,
        )
    }

    pub fn empty() -> Self {
        Self {
            display: DisplaySequence::new(),
            canonical: Vec::new(),
            canonical_positions: IdMap::default(),
            display_positions: IdMap::default(),
        }
    }

    pub fn display(&self) -> &DisplaySequence<D> {
        &self.display
    }

    pub fn canonical(&self) -> &[ItemId] {
        &self.canonical
    }

    pub fn len(&self) -> usize {
        self.display.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }

    pub fn display_index_of(&self, id: &ItemId) -> Option<usize> {
        self.display_positions.get(id).copied()
    }

    pub fn canonical_index_of(&self, id: &ItemId) -> Option<usize> {
        self.canonical_positions.get(id).copied()
    }

    /// Same contract as [`display_index_to_canonical`], backed by the position index.
    pub fn display_index_to_canonical(&self, index: usize) -> Result<usize, ListError> {
        let item = self
            .display
            .get(index)
            .ok_or(ListError::IndexOutOfBounds {
                index,
                len: self.display.len(),
            })?;
        if !item.is_record() {
            return Err(ListError::NotARecord { index });
        }
        self.canonical_index_of(&item.id)
            .ok_or_else(|| ListError::NotFound {
                id: item.id.clone(),
            })
    }

    /// Display index of the record at `canonical_index`, if it is shown.
    pub fn canonical_to_display(&self, canonical_index: usize) -> Option<usize> {
        let id = self.canonical.get(canonical_index)?;
        self.display_index_of(id)
    }
}

impl<D> Default for Projection<D> {
    fn default() -> Self {
        Self::empty()
    }
}
