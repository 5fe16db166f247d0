//! Per-type subscription registry with copy-on-write dispatch snapshots.
//!
//! The registry is the only mutable shared state in the crate. Each payload
//! type maps to one entry: the mutable, priority-ordered subscription list
//! plus an immutable snapshot of that list published for readers.
//!
//! ## Invariants
//! - A mutation (insert/remove) re-sorts and republishes the snapshot before
//!   releasing its exclusive access to the entry: readers always observe a
//!   snapshot that matched the list at a single instant.
//! - An entry exists iff its list is non-empty; removing the last
//!   subscription removes the entry itself.
//! - Snapshots are never mutated in place. Dispatch clones the snapshot
//!   `Arc` out of the map and iterates without holding any lock.

use std::any::TypeId;
use std::cmp::Reverse;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::subscribers::Subscription;

/// Immutable point-in-time view of one type's subscription list.
pub(crate) type Snapshot = Arc<[Arc<Subscription>]>;

/// One payload type's subscriptions: mutable list plus published snapshot.
struct TypeEntry {
    list: Vec<Arc<Subscription>>,
    snapshot: Snapshot,
}

impl TypeEntry {
    fn first(subscription: Arc<Subscription>) -> Self {
        let list = vec![subscription];
        let snapshot = list.iter().cloned().collect();
        Self { list, snapshot }
    }

    /// Re-sorts by priority descending, keeping subscribe order among equals.
    fn resort(&mut self) {
        self.list.sort_by_key(|s| (Reverse(s.priority()), s.seq()));
    }

    fn republish(&mut self) {
        self.snapshot = self.list.iter().cloned().collect();
    }
}

/// Mapping from payload type to its subscriptions.
#[derive(Default)]
pub(crate) struct Registry {
    entries: DashMap<TypeId, TypeEntry>,
}

impl Registry {
    /// Inserts a subscription unless the same handler is already registered
    /// for its type. Returns `false` on duplicate; nothing is mutated then.
    pub(crate) fn insert(&self, subscription: Arc<Subscription>) -> bool {
        match self.entries.entry(subscription.type_id()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();
                if entry
                    .list
                    .iter()
                    .any(|s| s.handler_id() == subscription.handler_id())
                {
                    return false;
                }
                entry.list.push(subscription);
                entry.resort();
                entry.republish();
                true
            }
            Entry::Vacant(vacant) => {
                vacant.insert(TypeEntry::first(subscription));
                true
            }
        }
    }

    /// Removes the exact subscription instance, by `Arc` identity.
    ///
    /// Returns `false` if it was not present. Removing the last subscription
    /// of a type removes the whole entry.
    pub(crate) fn remove(&self, subscription: &Arc<Subscription>) -> bool {
        match self.entries.entry(subscription.type_id()) {
            Entry::Occupied(mut occupied) => {
                let before = occupied.get().list.len();
                occupied
                    .get_mut()
                    .list
                    .retain(|s| !Arc::ptr_eq(s, subscription));
                if occupied.get().list.len() == before {
                    return false;
                }
                if occupied.get().list.is_empty() {
                    occupied.remove();
                } else {
                    // Removal keeps the existing order; no re-sort needed.
                    occupied.get_mut().republish();
                }
                true
            }
            Entry::Vacant(_) => false,
        }
    }

    /// Returns the current dispatch snapshot for a type, if any.
    ///
    /// The map guard is dropped before this returns; callers iterate the
    /// snapshot without blocking, or being blocked by, mutations.
    pub(crate) fn snapshot(&self, type_id: TypeId) -> Option<Snapshot> {
        self.entries.get(&type_id).map(|entry| entry.snapshot.clone())
    }

    /// Number of subscriptions registered for a type.
    pub(crate) fn handler_count(&self, type_id: TypeId) -> usize {
        self.entries.get(&type_id).map_or(0, |entry| entry.list.len())
    }

    /// Number of payload types with at least one subscription.
    pub(crate) fn type_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Envelope;
    use crate::subscribers::Handler;

    fn noop(priority: i32) -> Arc<Subscription> {
        let handler: Handler<u32> = Arc::new(|_env: &Envelope<u32>| Ok(()));
        Arc::new(Subscription::new::<u32>(priority, "", handler))
    }

    #[test]
    fn test_snapshot_matches_list_after_each_mutation() {
        let registry = Registry::default();
        let type_id = TypeId::of::<u32>();

        let subs: Vec<_> = [5, 10, 0].into_iter().map(noop).collect();
        for sub in &subs {
            assert!(registry.insert(sub.clone()));
            let snapshot = registry.snapshot(type_id).expect("entry must exist");
            assert_eq!(snapshot.len(), registry.handler_count(type_id));
        }

        assert!(registry.remove(&subs[1]));
        let snapshot = registry.snapshot(type_id).expect("entry must exist");
        assert_eq!(snapshot.len(), 2);
        assert_eq!(registry.handler_count(type_id), 2);
    }

    #[test]
    fn test_snapshot_is_priority_descending() {
        let registry = Registry::default();
        for priority in [0, 10, -3, 10] {
            registry.insert(noop(priority));
        }

        let snapshot = registry.snapshot(TypeId::of::<u32>()).unwrap();
        let priorities: Vec<_> = snapshot.iter().map(|s| s.priority()).collect();
        assert_eq!(priorities, vec![10, 10, 0, -3]);

        // Equal priorities stay in insertion order.
        assert!(snapshot[0].seq() < snapshot[1].seq());
    }

    #[test]
    fn test_duplicate_handler_rejected() {
        let registry = Registry::default();
        let handler: Handler<u32> = Arc::new(|_env: &Envelope<u32>| Ok(()));

        let first = Arc::new(Subscription::new::<u32>(0, "a", handler.clone()));
        let second = Arc::new(Subscription::new::<u32>(9, "b", handler));

        assert!(registry.insert(first));
        assert!(!registry.insert(second));
        assert_eq!(registry.handler_count(TypeId::of::<u32>()), 1);
    }

    #[test]
    fn test_entry_removed_when_last_subscription_goes() {
        let registry = Registry::default();
        let sub = noop(0);
        registry.insert(sub.clone());
        assert_eq!(registry.type_count(), 1);

        assert!(registry.remove(&sub));
        assert_eq!(registry.type_count(), 0, "empty entries must not linger");
        assert!(registry.snapshot(TypeId::of::<u32>()).is_none());

        assert!(!registry.remove(&sub), "second remove must be a no-op");
    }

    #[test]
    fn test_captured_snapshot_unaffected_by_later_mutations() {
        let registry = Registry::default();
        registry.insert(noop(0));

        let captured = registry.snapshot(TypeId::of::<u32>()).unwrap();
        registry.insert(noop(5));

        assert_eq!(captured.len(), 1);
        assert_eq!(registry.snapshot(TypeId::of::<u32>()).unwrap().len(), 2);
    }
}
