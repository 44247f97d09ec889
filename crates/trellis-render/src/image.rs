//! Image handles.
//!
//! Widgets never own pixel data. An [`Icon`] or [`Bitmap`] is a cheap handle
//! to an image the host loaded and keeps alive; the only things a widget
//! needs from it are its identity (to hand back to the renderer) and its
//! dimensions (to advance the layout cursor while painting).

/// Opaque identifier of a host-owned image resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u64);

/// A handle to a host-owned icon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Icon {
    id: ImageId,
    width: f32,
    height: f32,
}

impl Icon {
    /// Create an icon handle.
    pub fn new(id: ImageId, width: f32, height: f32) -> Self {
        Self { id, width, height }
    }

    /// The image resource this handle refers to.
    pub fn id(&self) -> ImageId {
        self.id
    }

    /// Icon width in pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Icon height in pixels.
    pub fn height(&self) -> f32 {
        self.height
    }
}

/// A handle to a host-owned bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bitmap {
    id: ImageId,
    width: f32,
    height: f32,
}

impl Bitmap {
    /// Create a bitmap handle.
    pub fn new(id: ImageId, width: f32, height: f32) -> Self {
        Self { id, width, height }
    }

    /// The image resource this handle refers to.
    pub fn id(&self) -> ImageId {
        self.id
    }

    /// Bitmap width in pixels.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Bitmap height in pixels.
    pub fn height(&self) -> f32 {
        self.height
    }
}

/// The image attached to a list item: an icon or a bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemImage {
    /// An icon handle.
    Icon(Icon),
    /// A bitmap handle.
    Bitmap(Bitmap),
}

impl ItemImage {
    /// Width of the underlying image in pixels.
    pub fn width(&self) -> f32 {
        match self {
            Self::Icon(icon) => icon.width(),
            Self::Bitmap(bitmap) => bitmap.width(),
        }
    }
}
