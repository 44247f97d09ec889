//! Core systems for the Trellis toolkit.
//!
//! This crate carries the pieces every widget depends on but that have no
//! visual representation of their own:
//!
//! - [`Object`] / [`ObjectBase`] / [`ObjectId`]: identity and parent/child
//!   relationships, backed by a process-wide registry.
//! - [`Signal`]: the notification primitive widgets use to report state
//!   changes (selection changed, popup opened, ...) to their owners.
//!
//! Trellis controls run single-threaded and cooperative: every operation
//! executes synchronously inside a message handler invoked by the host
//! runtime. Signals here therefore invoke their slots directly; there is no
//! queued delivery and no internal event loop.
//!
//! # Example
//!
//! ```
//! use trellis_core::{init_global_registry, Signal};
//!
//! init_global_registry();
//!
//! let selection_changed = Signal::<i32>::new();
//! selection_changed.connect(|&index| {
//!     println!("selected {index}");
//! });
//! selection_changed.emit(2);
//! ```

mod error;
mod object;
mod signal;

pub use error::{CoreError, CoreResult, ObjectError, SignalError};
pub use object::{
    global_registry, init_global_registry, Object, ObjectBase, ObjectId, ObjectRegistry,
    ObjectResult,
};
pub use signal::{ConnectionId, Signal};
