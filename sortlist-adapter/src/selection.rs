use alloc::rc::Rc;
use alloc::sync::Arc;
use core::fmt;

/// Turns incidental text selection off while a row is being dragged.
pub trait SelectionControl {
    fn set_suppressed(&self, suppressed: bool);
}

impl<T: SelectionControl + ?Sized> SelectionControl for &T {
    fn set_suppressed(&self, suppressed: bool) {
        (**self).set_suppressed(suppressed);
    }
}

impl<T: SelectionControl + ?Sized> SelectionControl for Rc<T> {
    fn set_suppressed(&self, suppressed: bool) {
        (**self).set_suppressed(suppressed);
    }
}

impl<T: SelectionControl + ?Sized> SelectionControl for Arc<T> {
    fn set_suppressed(&self, suppressed: bool) {
        (**self).set_suppressed(suppressed);
    }
}

/// Keeps selection suppressed for as long as it is alive.
///
/// Acquiring calls `set_suppressed(true)`; dropping calls `set_suppressed(false)`, on every
/// path (commit, cancel, interrupt, or the owner going away mid-drag).
#[must_use = "selection is restored as soon as the guard is dropped"]
pub struct SuppressionGuard<C: SelectionControl> {
    control: C,
}

impl<C: SelectionControl> SuppressionGuard<C> {
    pub fn acquire(control: C) -> Self {
        control.set_suppressed(true);
        Self { control }
    }
}

impl<C: SelectionControl> Drop for SuppressionGuard<C> {
    fn drop(&mut self) {
        self.control.set_suppressed(false);
    }
}

impl<C: SelectionControl> fmt::Debug for SuppressionGuard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SuppressionGuard(..)")
    }
}
