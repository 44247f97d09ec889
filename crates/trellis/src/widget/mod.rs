//! Widget system for Trellis.
//!
//! This module provides the widget architecture the controls are built on:
//!
//! - [`Widget`] trait: the base trait for all UI elements
//! - [`WidgetBase`]: common implementation for widget functionality
//! - Size hints and policies for layout negotiation
//! - Widget events for input handling
//! - Scrollbar policy types
//!
//! Widgets are delivered one event at a time by the host runtime and mutate
//! their state synchronously inside the handler; repaint requests accumulate
//! in the base's dirty region until the host paints.

mod base;
mod events;
mod geometry;
mod scroll;
mod traits;
pub mod widgets;

pub use base::{DirtyRegion, FocusPolicy, WidgetBase};
pub use events::{
    EventBase, FocusInEvent, FocusOutEvent, Key, KeyPressEvent, KeyboardModifiers, LeaveEvent,
    MouseButton, MouseDoubleClickEvent, MouseMoveEvent, MousePressEvent, MouseReleaseEvent,
    ResizeEvent, WheelEvent, WidgetEvent,
};
pub use geometry::{SizeHint, SizePolicy, SizePolicyPair};
pub use scroll::{ScrollBarPolicy, ScrollBarVisibility, ScrollCommand, ScrollInfo};
pub use traits::{PaintContext, Widget};
