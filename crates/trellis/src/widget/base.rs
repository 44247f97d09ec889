//! Widget base implementation.
//!
//! `WidgetBase` carries the state every widget shares: object identity,
//! geometry, visibility, enabled/focus state, and the pending invalidation
//! region. Widgets embed it as a field and delegate to it.

use trellis_core::{Object, ObjectBase, ObjectId, ObjectResult, Signal};
use trellis_render::{Point, Rect, Size};

use super::geometry::SizePolicyPair;

/// How a widget acquires keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusPolicy {
    /// The widget never takes focus.
    #[default]
    NoFocus,
    /// Focus on click only.
    ClickFocus,
    /// Focus by tab navigation only.
    TabFocus,
    /// Focus by click and tab.
    StrongFocus,
}

/// Pending repaint area accumulated between paint passes.
///
/// Mutations invalidate exactly the rows they touched; a shifted viewport or
/// a reset invalidates everything. The host drains this region once per
/// frame and clips its paint accordingly.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirtyRegion {
    /// Union of the invalidated rectangles, if any.
    rect: Option<Rect>,
    /// The whole widget needs repainting; supersedes `rect`.
    full: bool,
}

impl DirtyRegion {
    /// Whether anything is pending.
    pub fn is_dirty(&self) -> bool {
        self.full || self.rect.is_some()
    }

    /// Whether a full repaint is pending.
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// The pending rectangle, if the region is partial.
    pub fn partial_rect(&self) -> Option<Rect> {
        if self.full { None } else { self.rect }
    }

    fn add(&mut self, rect: Rect) {
        if self.full || rect.is_empty() {
            return;
        }
        self.rect = Some(match self.rect {
            Some(existing) => existing.union(rect),
            None => rect,
        });
    }

    fn mark_full(&mut self) {
        self.full = true;
        self.rect = None;
    }

    fn clear(&mut self) {
        self.full = false;
        self.rect = None;
    }
}

/// The base implementation for all widgets.
pub struct WidgetBase {
    /// The underlying object base for Object trait implementation.
    object_base: ObjectBase,

    /// The widget's geometry (position relative to parent and size).
    geometry: Rect,

    /// The widget's size policy for layout.
    size_policy: SizePolicyPair,

    /// Whether the widget is visible.
    visible: bool,

    /// Whether the widget is enabled (can receive input).
    enabled: bool,

    /// How the widget takes keyboard focus.
    focus_policy: FocusPolicy,

    /// Whether the widget currently has focus.
    focused: bool,

    /// Whether the mouse is currently over this widget.
    hovered: bool,

    /// Pending invalidation.
    dirty: DirtyRegion,

    /// Signal emitted when the geometry changes.
    pub geometry_changed: Signal<Rect>,

    /// Signal emitted when visibility changes.
    pub visible_changed: Signal<bool>,

    /// Signal emitted when enabled state changes.
    pub enabled_changed: Signal<bool>,
}

impl WidgetBase {
    /// Create a new widget base.
    ///
    /// # Panics
    ///
    /// Panics if the global object registry is not initialized.
    pub fn new<T: Object + 'static>() -> Self {
        Self {
            object_base: ObjectBase::new::<T>(),
            geometry: Rect::ZERO,
            size_policy: SizePolicyPair::default(),
            visible: true,
            enabled: true,
            focus_policy: FocusPolicy::NoFocus,
            focused: false,
            hovered: false,
            dirty: DirtyRegion {
                rect: None,
                full: true,
            },
            geometry_changed: Signal::new(),
            visible_changed: Signal::new(),
            enabled_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Object System Delegation
    // =========================================================================

    /// Get the widget's unique object ID.
    #[inline]
    pub fn object_id(&self) -> ObjectId {
        self.object_base.id()
    }

    /// Get the widget's name.
    pub fn name(&self) -> String {
        self.object_base.name()
    }

    /// Set the widget's name.
    pub fn set_name(&self, name: impl Into<String>) {
        self.object_base.set_name(name);
    }

    /// Get the parent widget's object ID.
    pub fn parent_id(&self) -> Option<ObjectId> {
        self.object_base.parent()
    }

    /// Set the parent widget.
    pub fn set_parent(&self, parent: Option<ObjectId>) -> ObjectResult<()> {
        self.object_base.set_parent(parent)
    }

    /// Get the IDs of child widgets.
    pub fn children_ids(&self) -> Vec<ObjectId> {
        self.object_base.children()
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Get the widget's geometry (position and size).
    #[inline]
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Set the widget's geometry.
    ///
    /// Emits `geometry_changed` if the geometry actually changed.
    pub fn set_geometry(&mut self, rect: Rect) {
        if self.geometry != rect {
            self.geometry = rect;
            self.dirty.mark_full();
            self.geometry_changed.emit(rect);
        }
    }

    /// Get the widget's position relative to its parent.
    #[inline]
    pub fn pos(&self) -> Point {
        self.geometry.origin
    }

    /// Move the widget to the specified position.
    pub fn move_to(&mut self, x: f32, y: f32) {
        let pos = Point::new(x, y);
        if self.geometry.origin != pos {
            self.geometry.origin = pos;
            self.geometry_changed.emit(self.geometry);
        }
    }

    /// Get the widget's size.
    #[inline]
    pub fn size(&self) -> Size {
        self.geometry.size
    }

    /// Resize the widget.
    pub fn resize(&mut self, width: f32, height: f32) {
        let size = Size::new(width, height);
        if self.geometry.size != size {
            self.geometry.size = size;
            self.dirty.mark_full();
            self.geometry_changed.emit(self.geometry);
        }
    }

    /// Get the widget's width.
    #[inline]
    pub fn width(&self) -> f32 {
        self.geometry.size.width
    }

    /// Get the widget's height.
    #[inline]
    pub fn height(&self) -> f32 {
        self.geometry.size.height
    }

    /// Get a rectangle representing the widget's local coordinate space.
    ///
    /// Always positioned at (0, 0) with the widget's size.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.geometry.size.width, self.geometry.size.height)
    }

    // =========================================================================
    // Size Policy
    // =========================================================================

    /// Get the widget's size policy.
    #[inline]
    pub fn size_policy(&self) -> SizePolicyPair {
        self.size_policy
    }

    /// Set the widget's size policy.
    pub fn set_size_policy(&mut self, policy: SizePolicyPair) {
        self.size_policy = policy;
    }

    // =========================================================================
    // Visibility / Enabled State
    // =========================================================================

    /// Check if the widget is visible.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set whether the widget is visible.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.dirty.mark_full();
            self.visible_changed.emit(visible);
        }
    }

    /// Show the widget.
    pub fn show(&mut self) {
        self.set_visible(true);
    }

    /// Hide the widget.
    pub fn hide(&mut self) {
        self.set_visible(false);
    }

    /// Check if the widget is enabled.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set whether the widget is enabled.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            self.enabled = enabled;
            self.dirty.mark_full();
            self.enabled_changed.emit(enabled);
        }
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Get the focus policy.
    #[inline]
    pub fn focus_policy(&self) -> FocusPolicy {
        self.focus_policy
    }

    /// Set the focus policy.
    pub fn set_focus_policy(&mut self, policy: FocusPolicy) {
        self.focus_policy = policy;
    }

    /// Check if the widget currently has keyboard focus.
    #[inline]
    pub fn has_focus(&self) -> bool {
        self.focused
    }

    /// Set the focused state (used by the focus management system).
    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.dirty.mark_full();
        }
    }

    // =========================================================================
    // Hover State
    // =========================================================================

    /// Check if the mouse is currently over this widget.
    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Set the hover state (used by the event system).
    pub fn set_hovered(&mut self, hovered: bool) {
        if self.hovered != hovered {
            self.hovered = hovered;
            self.dirty.mark_full();
        }
    }

    // =========================================================================
    // Invalidation
    // =========================================================================

    /// Add a widget-local rectangle to the pending repaint region.
    pub fn invalidate_rect(&mut self, rect: Rect) {
        self.dirty.add(rect);
    }

    /// Mark the whole widget for repaint.
    pub fn invalidate_all(&mut self) {
        self.dirty.mark_full();
    }

    /// The pending repaint region.
    pub fn dirty_region(&self) -> DirtyRegion {
        self.dirty
    }

    /// Check if the widget needs to be repainted.
    #[inline]
    pub fn needs_repaint(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// Drain the pending region (called by the host after painting).
    pub fn take_dirty_region(&mut self) -> DirtyRegion {
        let region = self.dirty;
        self.dirty.clear();
        region
    }

    // =========================================================================
    // Coordinate Mapping
    // =========================================================================

    /// Map a point from widget-local coordinates to parent coordinates.
    #[inline]
    pub fn map_to_parent(&self, point: Point) -> Point {
        Point::new(
            point.x + self.geometry.origin.x,
            point.y + self.geometry.origin.y,
        )
    }

    /// Map a point from parent coordinates to widget-local coordinates.
    #[inline]
    pub fn map_from_parent(&self, point: Point) -> Point {
        Point::new(
            point.x - self.geometry.origin.x,
            point.y - self.geometry.origin.y,
        )
    }

    /// Check if a point (in local coordinates) is inside the widget.
    #[inline]
    pub fn contains_point(&self, point: Point) -> bool {
        self.rect().contains(point)
    }
}

impl Object for WidgetBase {
    fn object_id(&self) -> ObjectId {
        self.object_base.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::init_global_registry;

    struct Probe {
        base: WidgetBase,
    }

    impl Probe {
        fn new() -> Self {
            Self {
                base: WidgetBase::new::<Self>(),
            }
        }
    }

    impl Object for Probe {
        fn object_id(&self) -> ObjectId {
            self.base.object_id()
        }
    }

    fn setup() {
        init_global_registry();
    }

    #[test]
    fn test_fresh_widget_needs_full_paint() {
        setup();
        let probe = Probe::new();
        assert!(probe.base.dirty_region().is_full());
    }

    #[test]
    fn test_partial_invalidation_unions() {
        setup();
        let mut probe = Probe::new();
        probe.base.take_dirty_region();

        probe.base.invalidate_rect(Rect::new(0.0, 20.0, 100.0, 20.0));
        probe.base.invalidate_rect(Rect::new(0.0, 60.0, 100.0, 20.0));

        let region = probe.base.dirty_region();
        assert!(!region.is_full());
        assert_eq!(region.partial_rect(), Some(Rect::new(0.0, 20.0, 100.0, 60.0)));
    }

    #[test]
    fn test_full_supersedes_partial() {
        setup();
        let mut probe = Probe::new();
        probe.base.take_dirty_region();

        probe.base.invalidate_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        probe.base.invalidate_all();

        let region = probe.base.take_dirty_region();
        assert!(region.is_full());
        assert_eq!(region.partial_rect(), None);
        assert!(!probe.base.needs_repaint());
    }

    #[test]
    fn test_resize_marks_full() {
        setup();
        let mut probe = Probe::new();
        probe.base.take_dirty_region();
        probe.base.resize(120.0, 80.0);
        assert!(probe.base.dirty_region().is_full());
        assert_eq!(probe.base.rect(), Rect::new(0.0, 0.0, 120.0, 80.0));
    }
}
