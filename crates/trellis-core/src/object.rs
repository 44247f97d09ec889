//! Object identity and ownership tree.
//!
//! Every widget owns an [`ObjectBase`] which registers it in the process-wide
//! [`ObjectRegistry`]. The registry tracks names and parent/child links so
//! composite controls (a combo box owning its edit and list children) can be
//! torn down as a unit and inspected by the host runtime.
//!
//! Identity is an [`ObjectId`] slot key: stable for the lifetime of the
//! object, never reused while the object is alive, and cheap to copy around.

use std::sync::OnceLock;

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

use crate::error::ObjectError;

new_key_type! {
    /// A unique identifier for a registered object.
    pub struct ObjectId;
}

/// A specialized Result type for object operations.
pub type ObjectResult<T> = std::result::Result<T, ObjectError>;

/// The trait implemented by every object participating in the ownership tree.
pub trait Object {
    /// Get this object's unique ID.
    fn object_id(&self) -> ObjectId;
}

struct ObjectEntry {
    name: String,
    type_name: &'static str,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
}

/// Process-wide table of live objects.
pub struct ObjectRegistry {
    entries: RwLock<SlotMap<ObjectId, ObjectEntry>>,
}

impl ObjectRegistry {
    fn new() -> Self {
        Self {
            entries: RwLock::new(SlotMap::with_key()),
        }
    }

    fn register(&self, type_name: &'static str) -> ObjectId {
        let id = self.entries.write().insert(ObjectEntry {
            name: String::new(),
            type_name,
            parent: None,
            children: Vec::new(),
        });
        tracing::trace!(?id, type_name, "object registered");
        id
    }

    fn unregister(&self, id: ObjectId) {
        tracing::trace!(?id, "object unregistered");
        let mut entries = self.entries.write();
        if let Some(entry) = entries.remove(id) {
            if let Some(parent) = entry.parent
                && let Some(parent_entry) = entries.get_mut(parent)
            {
                parent_entry.children.retain(|&c| c != id);
            }
            for child in entry.children {
                if let Some(child_entry) = entries.get_mut(child) {
                    child_entry.parent = None;
                }
            }
        }
    }

    /// Get an object's name.
    pub fn name(&self, id: ObjectId) -> ObjectResult<String> {
        self.entries
            .read()
            .get(id)
            .map(|e| e.name.clone())
            .ok_or(ObjectError::UnknownObject)
    }

    /// Set an object's name.
    pub fn set_name(&self, id: ObjectId, name: impl Into<String>) -> ObjectResult<()> {
        self.entries
            .write()
            .get_mut(id)
            .map(|e| e.name = name.into())
            .ok_or(ObjectError::UnknownObject)
    }

    /// Get the registered type name of an object.
    pub fn type_name(&self, id: ObjectId) -> ObjectResult<&'static str> {
        self.entries
            .read()
            .get(id)
            .map(|e| e.type_name)
            .ok_or(ObjectError::UnknownObject)
    }

    /// Get an object's parent, if any.
    pub fn parent(&self, id: ObjectId) -> ObjectResult<Option<ObjectId>> {
        self.entries
            .read()
            .get(id)
            .map(|e| e.parent)
            .ok_or(ObjectError::UnknownObject)
    }

    /// Re-parent an object. Passing `None` detaches it.
    pub fn set_parent(&self, id: ObjectId, parent: Option<ObjectId>) -> ObjectResult<()> {
        let mut entries = self.entries.write();
        if !entries.contains_key(id) {
            return Err(ObjectError::UnknownObject);
        }

        if let Some(new_parent) = parent {
            if !entries.contains_key(new_parent) {
                return Err(ObjectError::UnknownObject);
            }
            // Walk up from the new parent; finding `id` means a cycle.
            let mut current = Some(new_parent);
            while let Some(ancestor) = current {
                if ancestor == id {
                    return Err(ObjectError::ParentCycle);
                }
                current = entries.get(ancestor).and_then(|e| e.parent);
            }
        }

        let old_parent = entries[id].parent;
        if old_parent == parent {
            return Ok(());
        }

        if let Some(old) = old_parent
            && let Some(old_entry) = entries.get_mut(old)
        {
            old_entry.children.retain(|&c| c != id);
        }
        if let Some(new) = parent {
            entries[new].children.push(id);
        }
        entries[id].parent = parent;
        Ok(())
    }

    /// Get the IDs of an object's children.
    pub fn children(&self, id: ObjectId) -> ObjectResult<Vec<ObjectId>> {
        self.entries
            .read()
            .get(id)
            .map(|e| e.children.clone())
            .ok_or(ObjectError::UnknownObject)
    }

    /// Find a direct child by name.
    pub fn find_child_by_name(&self, id: ObjectId, name: &str) -> Option<ObjectId> {
        let entries = self.entries.read();
        let entry = entries.get(id)?;
        entry
            .children
            .iter()
            .copied()
            .find(|&c| entries.get(c).is_some_and(|e| e.name == name))
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

static GLOBAL_REGISTRY: OnceLock<ObjectRegistry> = OnceLock::new();

/// Initialize the global object registry.
///
/// Idempotent; subsequent calls return the existing registry.
pub fn init_global_registry() -> &'static ObjectRegistry {
    GLOBAL_REGISTRY.get_or_init(ObjectRegistry::new)
}

/// Get the global object registry.
pub fn global_registry() -> ObjectResult<&'static ObjectRegistry> {
    GLOBAL_REGISTRY.get().ok_or(ObjectError::RegistryNotInitialized)
}

/// The base implementation objects embed for registry participation.
///
/// Registers on construction, unregisters on drop. Widgets embed this
/// (through their `WidgetBase`) rather than implementing registration
/// themselves.
pub struct ObjectBase {
    id: ObjectId,
}

impl ObjectBase {
    /// Create and register a new object base.
    ///
    /// # Panics
    ///
    /// Panics if the global object registry is not initialized.
    pub fn new<T: Object + 'static>() -> Self {
        let registry = global_registry()
            .expect("object registry must be initialized before creating objects");
        Self {
            id: registry.register(std::any::type_name::<T>()),
        }
    }

    /// This object's ID.
    #[inline]
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Get the object's name.
    pub fn name(&self) -> String {
        global_registry()
            .and_then(|r| r.name(self.id))
            .unwrap_or_default()
    }

    /// Set the object's name.
    pub fn set_name(&self, name: impl Into<String>) {
        if let Ok(registry) = global_registry() {
            let _ = registry.set_name(self.id, name);
        }
    }

    /// Get the parent's ID, if any.
    pub fn parent(&self) -> Option<ObjectId> {
        global_registry().ok().and_then(|r| r.parent(self.id).ok().flatten())
    }

    /// Re-parent this object.
    pub fn set_parent(&self, parent: Option<ObjectId>) -> ObjectResult<()> {
        global_registry()?.set_parent(self.id, parent)
    }

    /// Get the IDs of this object's children.
    pub fn children(&self) -> Vec<ObjectId> {
        global_registry()
            .ok()
            .and_then(|r| r.children(self.id).ok())
            .unwrap_or_default()
    }

    /// Find a direct child by name.
    pub fn find_child_by_name(&self, name: &str) -> Option<ObjectId> {
        global_registry().ok().and_then(|r| r.find_child_by_name(self.id, name))
    }
}

impl Drop for ObjectBase {
    fn drop(&mut self) {
        if let Ok(registry) = global_registry() {
            registry.unregister(self.id);
        }
    }
}

impl Object for ObjectBase {
    fn object_id(&self) -> ObjectId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        base: ObjectBase,
    }

    impl Probe {
        fn new() -> Self {
            Self {
                base: ObjectBase::new::<Self>(),
            }
        }
    }

    impl Object for Probe {
        fn object_id(&self) -> ObjectId {
            self.base.id()
        }
    }

    fn setup() {
        init_global_registry();
    }

    #[test]
    fn test_register_and_drop() {
        setup();
        let id;
        {
            let probe = Probe::new();
            id = probe.object_id();
            assert!(global_registry().unwrap().name(id).is_ok());
        }
        assert_eq!(
            global_registry().unwrap().name(id),
            Err(ObjectError::UnknownObject)
        );
    }

    #[test]
    fn test_parent_child_links() {
        setup();
        let parent = Probe::new();
        let child = Probe::new();

        child.base.set_parent(Some(parent.object_id())).unwrap();
        assert_eq!(child.base.parent(), Some(parent.object_id()));
        assert_eq!(parent.base.children(), vec![child.object_id()]);

        child.base.set_parent(None).unwrap();
        assert!(parent.base.children().is_empty());
    }

    #[test]
    fn test_parent_cycle_rejected() {
        setup();
        let a = Probe::new();
        let b = Probe::new();

        b.base.set_parent(Some(a.object_id())).unwrap();
        assert_eq!(
            a.base.set_parent(Some(b.object_id())),
            Err(ObjectError::ParentCycle)
        );
    }

    #[test]
    fn test_find_child_by_name() {
        setup();
        let parent = Probe::new();
        let child = Probe::new();
        child.base.set_name("edit");
        child.base.set_parent(Some(parent.object_id())).unwrap();

        assert_eq!(
            parent.base.find_child_by_name("edit"),
            Some(child.object_id())
        );
        assert_eq!(parent.base.find_child_by_name("list"), None);
    }
}
