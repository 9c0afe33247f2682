/// A lightweight, serializable snapshot of a saved scroll position.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollState {
    pub offset: u64,
}

/// The last meaningful scroll offset of one list instance.
///
/// The store is read, never observed: after every re-layout the caller asks for
/// [`Self::restore`] and applies it to its scroll container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollPositionStore {
    state: ScrollState,
}

impl ScrollPositionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: ScrollState) -> Self {
        Self { state }
    }

    /// Records an observed offset.
    ///
    /// A zero offset is ignored: remounting a scroll container reports a transient scroll to
    /// the top, which must not discard the user's position. Returns `true` if the saved
    /// offset changed.
    pub fn save(&mut self, offset: u64) -> bool {
        if offset == 0 || offset == self.state.offset {
            return false;
        }
        ltrace!(offset, prev = self.state.offset, "ScrollPositionStore::save");
        self.state.offset = offset;
        true
    }

    pub fn restore(&self) -> u64 {
        self.state.offset
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Forgets the saved offset (e.g. when the list switches to a different data set).
    pub fn reset(&mut self) {
        self.state = ScrollState::default();
    }
}
