//! Render contract for the Trellis toolkit.
//!
//! Trellis widgets do not rasterize anything themselves. They describe what
//! needs painting through the [`ControlRenderer`] capability, which the host
//! supplies at paint time, typically backed by the platform's graphics
//! driver or a themed look-and-feel engine. This crate defines that contract
//! plus the geometry and color primitives the widgets use to speak it.
//!
//! - [`Point`], [`Size`], [`Rect`]: widget-local geometry.
//! - [`Color`]: RGBA colors for the element palette.
//! - [`Icon`], [`Bitmap`], [`ItemImage`]: cheap handles to host-owned images.
//! - [`ControlRenderer`]: item backgrounds, checkmarks, arrows, focus frames,
//!   text drawing and measurement.

mod color;
mod geometry;
mod image;
mod renderer;

pub use color::Color;
pub use geometry::{Point, Rect, Size};
pub use image::{Bitmap, Icon, ImageId, ItemImage};
pub use renderer::{
    ArrowDirection, ButtonState, CheckMark, ControlRenderer, MonospaceMetrics, TextMetrics,
    TextStyle,
};
