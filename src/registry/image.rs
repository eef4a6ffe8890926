//! Stable image handles.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use atlas_meta::Settings;

use crate::backend::ImageBackend;
use crate::sheet::{FRect, Rect};

/// Everything built for one qualified name.
#[derive(Debug, Clone)]
pub struct ImageData<S> {
    /// Surface after alpha conversion, before resizing
    pub raw: S,
    /// Surface with every setting applied
    pub surface: S,
    pub rect: Rect,
    pub frect: FRect,
    pub width: u32,
    pub height: u32,
    pub size: (u32, u32),
    /// Settings the surface was built with
    pub settings: Settings,
}

impl<S> ImageData<S> {
    pub(crate) fn new<B>(backend: &B, raw: S, surface: S, settings: Settings) -> Self
    where
        B: ImageBackend<Surface = S>,
    {
        let (width, height) = backend.dimensions(&surface);
        let rect = Rect::sized(width, height);
        Self {
            raw,
            surface,
            rect,
            frect: rect.to_frect(),
            width,
            height,
            size: (width, height),
            settings,
        }
    }
}

/// Shared handle to a registry image.
///
/// The registry keeps one handle per qualified name for its whole life.
/// `refresh`, `reload` and repeated `load` calls rewrite the data behind the
/// handle, so clones held by callers see the new content. Accessors return
/// owned values; no borrow of the shared data outlives a call.
pub struct Image<S> {
    inner: Rc<RefCell<ImageData<S>>>,
}

impl<S> Image<S> {
    pub(crate) fn new(data: ImageData<S>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(data)),
        }
    }

    pub(crate) fn replace(&self, data: ImageData<S>) {
        *self.inner.borrow_mut() = data;
    }

    pub fn width(&self) -> u32 {
        self.inner.borrow().width
    }

    pub fn height(&self) -> u32 {
        self.inner.borrow().height
    }

    pub fn size(&self) -> (u32, u32) {
        self.inner.borrow().size
    }

    pub fn rect(&self) -> Rect {
        self.inner.borrow().rect
    }

    pub fn frect(&self) -> FRect {
        self.inner.borrow().frect
    }

    pub fn settings(&self) -> Settings {
        self.inner.borrow().settings.clone()
    }

    /// Whether both handles point at the same registry entry.
    pub fn same_handle(&self, other: &Image<S>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<S: Clone> Image<S> {
    /// Snapshot of the current data.
    pub fn data(&self) -> ImageData<S> {
        self.inner.borrow().clone()
    }

    pub fn surface(&self) -> S {
        self.inner.borrow().surface.clone()
    }

    pub fn raw(&self) -> S {
        self.inner.borrow().raw.clone()
    }
}

impl<S> Clone for Image<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for Image<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.borrow();
        f.debug_struct("Image")
            .field("size", &data.size)
            .field("settings", &data.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{RasterBackend, RasterSurface};
    use ::image::RgbaImage;

    fn data(w: u32, h: u32) -> ImageData<RasterSurface> {
        let surface = RasterSurface::from_rgba(RgbaImage::new(w, h));
        ImageData::new(&RasterBackend, surface.clone(), surface, Settings::base())
    }

    #[test]
    fn test_geometry_from_surface() {
        let d = data(4, 3);
        assert_eq!(d.rect, Rect::new(0, 0, 4, 3));
        assert_eq!(d.frect.width, 4.0);
        assert_eq!(d.size, (4, 3));
    }

    #[test]
    fn test_replace_visible_through_clones() {
        let image = Image::new(data(2, 2));
        let held = image.clone();

        image.replace(data(8, 5));

        assert!(held.same_handle(&image));
        assert_eq!(held.size(), (8, 5));
        assert_eq!(held.data().height, 5);
    }

    #[test]
    fn test_snapshot_survives_replace() {
        let image = Image::new(data(3, 3));
        let snapshot = image.data();
        let surface = image.surface();

        image.replace(data(6, 2));

        assert_eq!(snapshot.size, (3, 3));
        assert_eq!(surface.pixels().dimensions(), (3, 3));
        assert_eq!(image.size(), (6, 2));
    }

    #[test]
    fn test_distinct_handles() {
        let a = Image::new(data(1, 1));
        let b = Image::new(data(1, 1));
        assert!(!a.same_handle(&b));
    }
}
