//! Core widget trait definitions.

use trellis_core::{Object, ObjectId};
use trellis_render::{ControlRenderer, Rect, Size};

use super::base::WidgetBase;
use super::events::WidgetEvent;
use super::geometry::SizeHint;

/// Context provided during widget painting.
///
/// Wraps the host-supplied [`ControlRenderer`] together with the widget's
/// local rectangle. Widgets never hold a renderer between paints; the host
/// lends one for exactly the duration of [`Widget::paint`].
pub struct PaintContext<'a> {
    /// The renderer to draw with.
    renderer: &'a mut dyn ControlRenderer,
    /// The widget's local rectangle (origin always 0,0).
    widget_rect: Rect,
    /// Whether to show focus indicator (widget has focus and window is active).
    show_focus: bool,
}

impl<'a> PaintContext<'a> {
    /// Create a new paint context.
    pub fn new(renderer: &'a mut dyn ControlRenderer, widget_rect: Rect) -> Self {
        Self {
            renderer,
            widget_rect,
            show_focus: false,
        }
    }

    /// Set whether to show focus indicator (builder pattern).
    pub fn with_show_focus(mut self, show_focus: bool) -> Self {
        self.show_focus = show_focus;
        self
    }

    /// Check if the focus indicator should be shown.
    #[inline]
    pub fn should_show_focus(&self) -> bool {
        self.show_focus
    }

    /// Get the renderer.
    #[inline]
    pub fn renderer(&mut self) -> &mut dyn ControlRenderer {
        self.renderer
    }

    /// Get the widget's local rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.widget_rect
    }

    /// Get the widget's width.
    #[inline]
    pub fn width(&self) -> f32 {
        self.widget_rect.width()
    }

    /// Get the widget's height.
    #[inline]
    pub fn height(&self) -> f32 {
        self.widget_rect.height()
    }

    /// Get the widget's size.
    #[inline]
    pub fn size(&self) -> Size {
        self.widget_rect.size
    }
}

/// The base trait for all UI elements.
///
/// A widget embeds a [`WidgetBase`], reports a [`SizeHint`] for layout,
/// paints itself through a [`PaintContext`], and consumes [`WidgetEvent`]s.
/// `event` returns `true` when the event was handled and should not
/// propagate further.
pub trait Widget: Object {
    /// Access the widget's base.
    fn widget_base(&self) -> &WidgetBase;

    /// Mutably access the widget's base.
    fn widget_base_mut(&mut self) -> &mut WidgetBase;

    /// The widget's preferred size for layout.
    fn size_hint(&self) -> SizeHint;

    /// Paint the widget.
    fn paint(&self, ctx: &mut PaintContext<'_>);

    /// Handle an event. Returns `true` if the event was consumed.
    fn event(&mut self, event: &mut WidgetEvent) -> bool;

    /// The widget's object ID (convenience over the base).
    fn id(&self) -> ObjectId {
        self.widget_base().object_id()
    }
}
