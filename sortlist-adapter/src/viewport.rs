use sortlist::Rect;

/// Supplies the size of the scroll container.
///
/// Geometry is pulled by the list when the host reports a resize; the list never queries the
/// UI tree itself.
pub trait ViewportProvider {
    fn viewport(&self) -> Rect;
}

impl ViewportProvider for Rect {
    fn viewport(&self) -> Rect {
        *self
    }
}

impl<T: ViewportProvider + ?Sized> ViewportProvider for &T {
    fn viewport(&self) -> Rect {
        (**self).viewport()
    }
}
