//! Widget events.
//!
//! The host runtime translates its input stream into these event types and
//! delivers them one at a time through [`Widget::event`]. Delivery is
//! synchronous and non-reentrant: a handler runs to completion before the
//! next event arrives.
//!
//! [`Widget::event`]: super::traits::Widget::event

use trellis_render::{Point, Size};

/// State of the keyboard modifiers during an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub control: bool,
    /// Alt key held.
    pub alt: bool,
}

impl KeyboardModifiers {
    /// Whether any modifier is held.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// The primary button.
    Left,
    /// The secondary button.
    Right,
    /// The wheel button.
    Middle,
}

/// Keys the list controls react to.
///
/// Printable input arrives through [`KeyPressEvent::text`] rather than as
/// per-character variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Main Enter key.
    Enter,
    /// Numpad Enter key.
    NumpadEnter,
    /// Escape.
    Escape,
    /// Space bar.
    Space,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Tab.
    Tab,
    /// Any key not otherwise classified.
    Other,
}

impl Key {
    /// Whether this key confirms an entry (either Enter key).
    pub fn is_enter(&self) -> bool {
        matches!(self, Self::Enter | Self::NumpadEnter)
    }
}

/// Shared accept/ignore state embedded in every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventBase {
    accepted: bool,
}

impl EventBase {
    /// Create an unaccepted event base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a handler accepted the event.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Mark the event as handled.
    pub fn accept(&mut self) {
        self.accepted = true;
    }

    /// Mark the event as unhandled so it propagates.
    pub fn ignore(&mut self) {
        self.accepted = false;
    }
}

/// A mouse button was pressed inside the widget.
#[derive(Debug, Clone)]
pub struct MousePressEvent {
    /// Accept/ignore state.
    pub base: EventBase,
    /// Position in widget-local coordinates.
    pub local_pos: Point,
    /// The pressed button.
    pub button: MouseButton,
    /// Modifier state at press time.
    pub modifiers: KeyboardModifiers,
}

impl MousePressEvent {
    /// Create a press event.
    pub fn new(local_pos: Point, button: MouseButton, modifiers: KeyboardModifiers) -> Self {
        Self {
            base: EventBase::new(),
            local_pos,
            button,
            modifiers,
        }
    }
}

/// A mouse button was released.
#[derive(Debug, Clone)]
pub struct MouseReleaseEvent {
    /// Accept/ignore state.
    pub base: EventBase,
    /// Position in widget-local coordinates.
    pub local_pos: Point,
    /// The released button.
    pub button: MouseButton,
    /// Modifier state at release time.
    pub modifiers: KeyboardModifiers,
}

impl MouseReleaseEvent {
    /// Create a release event.
    pub fn new(local_pos: Point, button: MouseButton, modifiers: KeyboardModifiers) -> Self {
        Self {
            base: EventBase::new(),
            local_pos,
            button,
            modifiers,
        }
    }
}

/// The mouse moved over the widget.
#[derive(Debug, Clone)]
pub struct MouseMoveEvent {
    /// Accept/ignore state.
    pub base: EventBase,
    /// Position in widget-local coordinates.
    pub local_pos: Point,
    /// Modifier state.
    pub modifiers: KeyboardModifiers,
}

impl MouseMoveEvent {
    /// Create a move event.
    pub fn new(local_pos: Point, modifiers: KeyboardModifiers) -> Self {
        Self {
            base: EventBase::new(),
            local_pos,
            modifiers,
        }
    }
}

/// A mouse button was double-clicked.
#[derive(Debug, Clone)]
pub struct MouseDoubleClickEvent {
    /// Accept/ignore state.
    pub base: EventBase,
    /// Position in widget-local coordinates.
    pub local_pos: Point,
    /// The clicked button.
    pub button: MouseButton,
}

impl MouseDoubleClickEvent {
    /// Create a double-click event.
    pub fn new(local_pos: Point, button: MouseButton) -> Self {
        Self {
            base: EventBase::new(),
            local_pos,
            button,
        }
    }
}

/// A key went down.
#[derive(Debug, Clone)]
pub struct KeyPressEvent {
    /// Accept/ignore state.
    pub base: EventBase,
    /// The classified key.
    pub key: Key,
    /// Modifier state.
    pub modifiers: KeyboardModifiers,
    /// Printable text produced by the key, empty for pure navigation keys.
    pub text: String,
    /// Whether this press comes from the host's auto-repeat.
    pub is_repeat: bool,
}

impl KeyPressEvent {
    /// Create a key press event.
    pub fn new(key: Key, modifiers: KeyboardModifiers, text: impl Into<String>) -> Self {
        Self {
            base: EventBase::new(),
            key,
            modifiers,
            text: text.into(),
            is_repeat: false,
        }
    }

    /// Create a printable-character press.
    pub fn character(ch: char) -> Self {
        Self::new(Key::Other, KeyboardModifiers::default(), ch.to_string())
    }
}

/// The wheel rotated over the widget.
#[derive(Debug, Clone)]
pub struct WheelEvent {
    /// Accept/ignore state.
    pub base: EventBase,
    /// Vertical wheel delta; positive rolls away from the user.
    pub delta_y: f32,
}

impl WheelEvent {
    /// Create a wheel event.
    pub fn new(delta_y: f32) -> Self {
        Self {
            base: EventBase::new(),
            delta_y,
        }
    }
}

/// The widget gained keyboard focus.
#[derive(Debug, Clone, Default)]
pub struct FocusInEvent {
    /// Accept/ignore state.
    pub base: EventBase,
}

/// The widget lost keyboard focus.
#[derive(Debug, Clone, Default)]
pub struct FocusOutEvent {
    /// Accept/ignore state.
    pub base: EventBase,
}

/// The mouse left the widget.
#[derive(Debug, Clone, Default)]
pub struct LeaveEvent {
    /// Accept/ignore state.
    pub base: EventBase,
}

/// The widget was resized.
#[derive(Debug, Clone)]
pub struct ResizeEvent {
    /// Accept/ignore state.
    pub base: EventBase,
    /// Size before the change.
    pub old_size: Size,
    /// Size after the change.
    pub new_size: Size,
}

impl ResizeEvent {
    /// Create a resize event.
    pub fn new(old_size: Size, new_size: Size) -> Self {
        Self {
            base: EventBase::new(),
            old_size,
            new_size,
        }
    }
}

/// The closed set of events a widget can receive.
#[derive(Debug, Clone)]
pub enum WidgetEvent {
    /// Mouse button press.
    MousePress(MousePressEvent),
    /// Mouse button release.
    MouseRelease(MouseReleaseEvent),
    /// Mouse movement.
    MouseMove(MouseMoveEvent),
    /// Mouse double-click.
    MouseDoubleClick(MouseDoubleClickEvent),
    /// Key press (navigation or printable text).
    KeyPress(KeyPressEvent),
    /// Wheel rotation.
    Wheel(WheelEvent),
    /// Keyboard focus gained.
    FocusIn(FocusInEvent),
    /// Keyboard focus lost.
    FocusOut(FocusOutEvent),
    /// Mouse left the widget.
    Leave(LeaveEvent),
    /// Geometry changed.
    Resize(ResizeEvent),
}

impl WidgetEvent {
    fn base(&self) -> &EventBase {
        match self {
            Self::MousePress(e) => &e.base,
            Self::MouseRelease(e) => &e.base,
            Self::MouseMove(e) => &e.base,
            Self::MouseDoubleClick(e) => &e.base,
            Self::KeyPress(e) => &e.base,
            Self::Wheel(e) => &e.base,
            Self::FocusIn(e) => &e.base,
            Self::FocusOut(e) => &e.base,
            Self::Leave(e) => &e.base,
            Self::Resize(e) => &e.base,
        }
    }

    fn base_mut(&mut self) -> &mut EventBase {
        match self {
            Self::MousePress(e) => &mut e.base,
            Self::MouseRelease(e) => &mut e.base,
            Self::MouseMove(e) => &mut e.base,
            Self::MouseDoubleClick(e) => &mut e.base,
            Self::KeyPress(e) => &mut e.base,
            Self::Wheel(e) => &mut e.base,
            Self::FocusIn(e) => &mut e.base,
            Self::FocusOut(e) => &mut e.base,
            Self::Leave(e) => &mut e.base,
            Self::Resize(e) => &mut e.base,
        }
    }

    /// Whether a handler accepted the event.
    pub fn is_accepted(&self) -> bool {
        self.base().is_accepted()
    }

    /// Mark the event as handled.
    pub fn accept(&mut self) {
        self.base_mut().accept();
    }

    /// Mark the event as unhandled.
    pub fn ignore(&mut self) {
        self.base_mut().ignore();
    }
}
