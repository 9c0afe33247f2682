#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::ItemId;

/// Per-list map keyed by stable item identity.
#[cfg(feature = "std")]
pub(crate) type IdMap<V> = HashMap<ItemId, V>;
#[cfg(not(feature = "std"))]
pub(crate) type IdMap<V> = BTreeMap<ItemId, V>;
