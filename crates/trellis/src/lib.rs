//! # Trellis
//!
//! A Rust-native GUI toolkit core for embedded systems. This crate carries
//! the list-selection controls ([`ListBox`], the four-mode [`ComboBox`],
//! and the item store behind them) together with the widget architecture
//! they are built on.
//!
//! The toolkit core is deliberately free of platform bindings: the host
//! runtime delivers [`WidgetEvent`]s, paints through an injected
//! [`ControlRenderer`](trellis_render::ControlRenderer), and reads scrollbar
//! state back out of the widgets. Everything runs single-threaded and
//! cooperative; a handler completes before the next event arrives.
//!
//! # Quick start
//!
//! ```
//! use trellis::widget::widgets::ListBox;
//! use trellis_core::init_global_registry;
//!
//! init_global_registry();
//!
//! let mut list = ListBox::new();
//! list.add_string("Apple").unwrap();
//! list.add_string("Banana").unwrap();
//! list.set_cur_sel(Some(1)).unwrap();
//!
//! assert_eq!(list.cur_sel(), Some(1));
//! ```
//!
//! [`ListBox`]: widget::widgets::ListBox
//! [`ComboBox`]: widget::widgets::ComboBox
//! [`WidgetEvent`]: widget::WidgetEvent

pub mod error;
pub mod model;
pub mod prelude;
pub mod widget;

pub use error::{ControlError, ControlResult};
