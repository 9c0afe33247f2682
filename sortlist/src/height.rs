use alloc::vec::Vec;

use crate::key::IdMap;
use crate::{DisplaySequence, HeightPolicy, Item, ItemId, ItemKind, ListError};

/// A snapshot of the cached height of one row.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeightEntry {
    pub item_id: ItemId,
    pub height: u32,
    /// `false` while `height` is still an estimate.
    pub is_measured: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RowClass {
    Record,
    FirstLabel,
    Label,
}

fn class_estimate(policy: &HeightPolicy, is_compact: bool, class: RowClass) -> u32 {
    match class {
        RowClass::Record => policy.record_height(is_compact),
        RowClass::FirstLabel => policy.label_height(0),
        RowClass::Label => policy.label_height(1),
    }
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    class: RowClass,
    height: u32,
    measured: bool,
}

/// Per-list row heights keyed by item identity.
///
/// Every row of the current display sequence has an entry: an estimate derived from its kind
/// and the compact flag until a real measurement is recorded. A measured entry is never
/// replaced by an estimate; only another measurement or an explicit invalidation touches it.
#[derive(Clone, Debug)]
pub struct HeightCache {
    policy: HeightPolicy,
    is_compact: bool,
    slots: IdMap<Slot>,
}

impl HeightCache {
    pub fn new(policy: HeightPolicy, is_compact: bool) -> Self {
        Self {
            policy,
            is_compact,
            slots: IdMap::default(),
        }
    }

    pub fn policy(&self) -> HeightPolicy {
        self.policy
    }

    pub fn is_compact(&self) -> bool {
        self.is_compact
    }

    /// Estimated height for `item` at display `index`. Pure in kind, index and compact flag.
    pub fn estimate<D>(&self, item: &Item<D>, index: usize) -> u32 {
        self.policy.estimate(&item.kind, index, self.is_compact)
    }

    fn estimate_class(&self, class: RowClass) -> u32 {
        class_estimate(&self.policy, self.is_compact, class)
    }

    /// Aligns the cache with a freshly built display sequence.
    ///
    /// Measurements of ids that are still present are kept, new ids get estimates and ids that
    /// left the sequence are dropped.
    pub fn sync<D>(&mut self, sequence: &DisplaySequence<D>) {
        let mut next = IdMap::default();
        for (index, item) in sequence.iter().enumerate() {
            let class = match item.kind {
                ItemKind::Record(_) => RowClass::Record,
                ItemKind::GroupLabel { .. } if index == 0 => RowClass::FirstLabel,
                ItemKind::GroupLabel { .. } => RowClass::Label,
            };
            let slot = match self.slots.get(&item.id) {
                Some(prev) if prev.measured => Slot { class, ..*prev },
                _ => Slot {
                    class,
                    height: self.estimate_class(class),
                    measured: false,
                },
            };
            next.insert(item.id.clone(), slot);
        }
        ldebug!(
            rows = sequence.len(),
            measured = next.values().filter(|s: &&Slot| s.measured).count(),
            "HeightCache::sync"
        );
        self.slots = next;
    }

    /// Records a real measurement.
    ///
    /// Returns `Ok(true)` when the stored height changed, `Ok(false)` when the same
    /// measurement was already recorded, and [`ListError::StaleMeasurement`] when `id` is not
    /// part of the current sequence (the measurement is discarded).
    pub fn record(&mut self, id: &ItemId, height: u32) -> Result<bool, ListError> {
        let Some(slot) = self.slots.get_mut(id) else {
            return Err(ListError::StaleMeasurement { id: id.clone() });
        };
        if slot.measured && slot.height == height {
            return Ok(false);
        }
        ltrace!(id = %id, height, prev = slot.height, "HeightCache::record");
        slot.height = height;
        slot.measured = true;
        Ok(true)
    }

    /// The measured height if there is one, otherwise the estimate.
    pub fn get(&self, id: &ItemId) -> Option<u32> {
        self.slots.get(id).map(|s| s.height)
    }

    /// Height of `item` at `index`, falling back to a fresh estimate for unknown ids.
    pub fn height_of<D>(&self, item: &Item<D>, index: usize) -> u32 {
        self.get(&item.id)
            .unwrap_or_else(|| self.estimate(item, index))
    }

    pub fn entry(&self, id: &ItemId) -> Option<HeightEntry> {
        self.slots.get(id).map(|s| HeightEntry {
            item_id: id.clone(),
            height: s.height,
            is_measured: s.measured,
        })
    }

    pub fn is_measured(&self, id: &ItemId) -> bool {
        self.slots.get(id).is_some_and(|s| s.measured)
    }

    /// Drops the measurement for `id`, reverting it to its estimate.
    ///
    /// Returns `true` if a measurement was dropped.
    pub fn invalidate(&mut self, id: &ItemId) -> bool {
        let (policy, is_compact) = (self.policy, self.is_compact);
        match self.slots.get_mut(id) {
            Some(slot) if slot.measured => {
                slot.height = class_estimate(&policy, is_compact, slot.class);
                slot.measured = false;
                true
            }
            _ => false,
        }
    }

    /// Drops every measurement and re-derives all estimates.
    pub fn invalidate_all(&mut self) {
        ldebug!(rows = self.slots.len(), "HeightCache::invalidate_all");
        let (policy, is_compact) = (self.policy, self.is_compact);
        for slot in self.slots.values_mut() {
            slot.measured = false;
            slot.height = class_estimate(&policy, is_compact, slot.class);
        }
    }

    /// Switches the compact flag. Height formulas change, so every measurement is dropped.
    pub fn set_compact(&mut self, is_compact: bool) {
        if self.is_compact == is_compact {
            return;
        }
        self.is_compact = is_compact;
        self.invalidate_all();
    }

    pub fn set_policy(&mut self, policy: HeightPolicy) {
        if self.policy == policy {
            return;
        }
        self.policy = policy;
        self.invalidate_all();
    }

    /// Number of rows tracked (the length of the last synced sequence).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn measured_len(&self) -> usize {
        self.slots.values().filter(|s| s.measured).count()
    }

    /// Exports the measured heights sorted by id (useful to warm a cache on remount).
    pub fn export_measurements(&self) -> Vec<(ItemId, u32)> {
        let mut out: Vec<(ItemId, u32)> = self
            .slots
            .iter()
            .filter(|(_, s)| s.measured)
            .map(|(id, s)| (id.clone(), s.height))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Applies previously exported measurements. Entries for ids outside the current
    /// sequence are discarded.
    ///
    /// Returns the number of measurements applied.
    pub fn import_measurements(
        &mut self,
        entries: impl IntoIterator<Item = (ItemId, u32)>,
    ) -> usize {
        let mut applied = 0usize;
        for (id, height) in entries {
            if self.record(&id, height).is_ok() {
                applied += 1;
            }
        }
        ldebug!(applied, "HeightCache::import_measurements");
        applied
    }
}

impl Default for HeightCache {
    fn default() -> Self {
        Self::new(HeightPolicy::default(), false)
    }
}
