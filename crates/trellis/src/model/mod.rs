//! Item storage for the list controls.
//!
//! The model layer is deliberately small: a slot [`arena`](ItemArena) that
//! makes item churn cheap, the linked [`ItemStore`] sequence built on it,
//! and the [`KeyComparator`] ordering strategy. Widgets own their store
//! exclusively; nothing here is shared between widget instances.

mod arena;
mod compare;
mod item;
mod store;

pub use arena::{ItemArena, ItemIndex, DEFAULT_POOL_LEN};
pub use compare::{ByteWiseComparator, CaseInsensitiveComparator, KeyComparator};
pub use item::{CheckState, ItemFlags, ListBoxItemInfo, ListItem};
pub use store::{ItemStore, Items};
