//! Signal/slot notification mechanism.
//!
//! Widgets expose their notifications as public [`Signal`] fields; the owner
//! connects closures to the signals it cares about. Emission is synchronous
//! and runs in the emitting call frame; the cooperative runtime model means
//! there is exactly one thread of control, so no queued or cross-thread
//! delivery exists here.
//!
//! # Example
//!
//! ```
//! use trellis_core::Signal;
//!
//! let text_changed = Signal::<String>::new();
//! let id = text_changed.connect(|text| {
//!     println!("text is now {text}");
//! });
//! text_changed.emit("42".to_string());
//! text_changed.disconnect(id);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via
    /// [`Signal::disconnect`].
    pub struct ConnectionId;
}

/// A type-safe signal with any number of connected slots.
///
/// `Args` is the argument type passed to slots; use `()` for argument-less
/// signals or a tuple for several values.
pub struct Signal<Args> {
    /// All active connections.
    connections: Mutex<SlotMap<ConnectionId, Arc<dyn Fn(&Args) + Send + Sync>>>,
    /// Whether signal emission is temporarily blocked.
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a [`ConnectionId`] that can be used to disconnect later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Temporarily block or unblock emission.
    ///
    /// Returns the previous blocked state. While blocked, [`emit`](Self::emit)
    /// is a no-op.
    pub fn set_blocked(&self, blocked: bool) -> bool {
        self.blocked.swap(blocked, Ordering::SeqCst)
    }

    /// Whether emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking every connected slot with `args`.
    ///
    /// Slots are invoked synchronously in the emitting call frame. The
    /// connection table is not held locked during invocation, so a slot may
    /// connect or disconnect other slots without deadlocking.
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            return;
        }

        let slots: Vec<_> = self.connections.lock().values().cloned().collect();
        for slot in slots {
            slot(&args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_emit_invokes_slots() {
        let signal = Signal::<i32>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_a = hits.clone();
        signal.connect(move |&v| {
            assert_eq!(v, 7);
            hits_a.fetch_add(1, Ordering::SeqCst);
        });
        let hits_b = hits.clone();
        signal.connect(move |_| {
            hits_b.fetch_add(1, Ordering::SeqCst);
        });

        signal.emit(7);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_disconnect() {
        let signal = Signal::<()>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_a = hits.clone();
        let id = signal.connect(move |_| {
            hits_a.fetch_add(1, Ordering::SeqCst);
        });

        signal.emit(());
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(());

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_blocked_emission() {
        let signal = Signal::<()>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_a = hits.clone();
        signal.connect(move |_| {
            hits_a.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!signal.set_blocked(true));
        signal.emit(());
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        assert!(signal.set_blocked(false));
        signal.emit(());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_slot_may_reconnect_during_emit() {
        let signal = Arc::new(Signal::<()>::new());
        let inner = signal.clone();
        signal.connect(move |_| {
            // Connecting from inside a slot must not deadlock.
            inner.connect(|_| {});
        });
        signal.emit(());
        assert_eq!(signal.connection_count(), 2);
    }
}
