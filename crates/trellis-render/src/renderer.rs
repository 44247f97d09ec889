//! The control renderer capability.

use crate::color::Color;
use crate::geometry::{Point, Rect, Size};
use crate::image::{Bitmap, Icon};

/// Tri-state checkmark rendering state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMark {
    /// Empty shell, nothing selected.
    #[default]
    Blank,
    /// Fully selected.
    Checked,
    /// Half selected.
    PartiallyChecked,
}

/// Direction of a spin/drop-down arrow glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowDirection {
    /// Pointing up.
    Up,
    /// Pointing down.
    Down,
    /// Pointing left.
    Left,
    /// Pointing right.
    Right,
}

/// Visual state of a button-like element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    /// At rest.
    #[default]
    Normal,
    /// Mouse over.
    Hilite,
    /// Pressed down.
    Pressed,
}

/// Text styling passed alongside draw/measure calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    /// Render with a bold weight.
    pub bold: bool,
}

/// Layout-time text measurement.
///
/// Widgets need text extents outside of paint (a list box maintains its
/// widest-item extent as items come and go). The host injects this at widget
/// construction, typically backed by the same font engine its
/// [`ControlRenderer`] draws with.
pub trait TextMetrics: Send {
    /// Measure a single line of text.
    fn text_extent(&self, text: &str, style: TextStyle) -> Size;

    /// Height of one text line.
    fn line_height(&self) -> f32;
}

/// Fixed-advance metrics.
///
/// A deterministic stand-in for hosts without a font engine (and for tests):
/// every glyph advances by the same amount.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMetrics {
    /// Horizontal advance per glyph.
    pub advance: f32,
    /// Line height.
    pub line: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance: 8.0,
            line: 16.0,
        }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn text_extent(&self, text: &str, _style: TextStyle) -> Size {
        Size::new(text.chars().count() as f32 * self.advance, self.line)
    }

    fn line_height(&self) -> f32 {
        self.line
    }
}

/// The injected rendering capability Trellis controls paint through.
///
/// The host supplies an implementation at paint time, usually its themed
/// look-and-feel engine. Widgets select WHICH element to draw and WHERE; the
/// renderer decides how it looks. Nothing here retains state between calls.
pub trait ControlRenderer {
    /// Paint the background of an item at rest.
    fn draw_normal_item(&mut self, rect: Rect, color: Color);

    /// Paint the background of a selected/hilited item.
    fn draw_hilite_item(&mut self, rect: Rect, color: Color);

    /// Paint the background of a disabled item.
    fn draw_disabled_item(&mut self, rect: Rect, color: Color);

    /// Overlay the emphasis background of a significant item.
    fn draw_significant_item(&mut self, rect: Rect, color: Color);

    /// Paint a tri-state checkmark glyph inside `rect`.
    fn draw_checkmark(&mut self, rect: Rect, color: Color, state: CheckMark);

    /// Paint a shelled arrow glyph (spin buttons, drop-down affordance).
    fn draw_arrow(&mut self, rect: Rect, color: Color, direction: ArrowDirection, state: ButtonState);

    /// Paint the keyboard-focus frame around `rect`.
    fn draw_focus_frame(&mut self, rect: Rect, color: Color);

    /// Draw a single line of text with its top-left corner at `origin`.
    fn draw_text(&mut self, origin: Point, text: &str, color: Color, style: TextStyle);

    /// Measure a single line of text.
    fn text_extent(&mut self, text: &str, style: TextStyle) -> Size;

    /// Blit an icon scaled into `rect`.
    fn draw_icon(&mut self, rect: Rect, icon: Icon);

    /// Blit a bitmap with its top-left corner at `rect.origin`.
    fn draw_bitmap(&mut self, rect: Rect, bitmap: Bitmap);
}
