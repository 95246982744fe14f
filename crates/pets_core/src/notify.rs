//! In-process change notification bus.
//!
//! # Responsibility
//! - Register observers against a watched pets address.
//! - Fan out change signals published by the provider after mutations.
//!
//! # Invariants
//! - Delivery is fire-and-forget; no ordering is guaranteed across observers.
//! - Observers are invoked outside the registry lock, so an observer may
//!   register or unregister others while being notified.

use crate::path::PetPath;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Receives change signals for a watched address.
pub trait ChangeObserver: Send + Sync {
    /// Called after a mutation at `changed` affected at least one row.
    fn on_change(&self, changed: PetPath);
}

impl<F> ChangeObserver for F
where
    F: Fn(PetPath) + Send + Sync,
{
    fn on_change(&self, changed: PetPath) {
        self(changed)
    }
}

/// Handle returned by registration, used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

struct Registration {
    watched: PetPath,
    notify_for_descendants: bool,
    observer: Arc<dyn ChangeObserver>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    observers: BTreeMap<ObserverId, Registration>,
}

/// Observer registry shared by a provider and its subscribers.
#[derive(Default)]
pub struct ChangeBus {
    registry: Mutex<Registry>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` for changes visible at `watched`.
    ///
    /// With `notify_for_descendants`, a collection observer also receives
    /// changes published for individual items.
    pub fn register(
        &self,
        watched: PetPath,
        notify_for_descendants: bool,
        observer: Arc<dyn ChangeObserver>,
    ) -> ObserverId {
        let mut registry = self.lock();
        let id = ObserverId(registry.next_id);
        registry.next_id += 1;
        registry.observers.insert(
            id,
            Registration {
                watched,
                notify_for_descendants,
                observer,
            },
        );
        debug!("event=observer_register module=notify status=ok watched={watched}");
        id
    }

    /// Removes one observer. Returns `false` when the id is unknown.
    pub fn unregister(&self, id: ObserverId) -> bool {
        self.lock().observers.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().observers.is_empty()
    }

    /// Delivers a change signal to every observer it is visible to.
    ///
    /// Returns the number of observers notified.
    pub fn notify_change(&self, changed: PetPath) -> usize {
        let targets: Vec<Arc<dyn ChangeObserver>> = self
            .lock()
            .observers
            .values()
            .filter(|reg| reg.watched.is_affected_by(changed, reg.notify_for_descendants))
            .map(|reg| Arc::clone(&reg.observer))
            .collect();

        for observer in &targets {
            observer.on_change(changed);
        }

        debug!(
            "event=notify_change module=notify status=ok path={} observers={}",
            changed,
            targets.len()
        );
        targets.len()
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        match self.registry.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("event=observer_registry module=notify status=recovered reason=poisoned");
                poisoned.into_inner()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChangeBus;
    use crate::path::PetPath;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn counter(bus: &ChangeBus, watched: PetPath, descendants: bool) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&hits);
        bus.register(
            watched,
            descendants,
            Arc::new(move |_changed: PetPath| {
                sink.fetch_add(1, Ordering::SeqCst);
            }),
        );
        hits
    }

    #[test]
    fn collection_change_reaches_every_observer() {
        let bus = ChangeBus::new();
        let collection = counter(&bus, PetPath::Collection, false);
        let item = counter(&bus, PetPath::Item(4), false);

        assert_eq!(bus.notify_change(PetPath::Collection), 2);
        assert_eq!(collection.load(Ordering::SeqCst), 1);
        assert_eq!(item.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn item_change_respects_descendant_flag() {
        let bus = ChangeBus::new();
        let shallow = counter(&bus, PetPath::Collection, false);
        let deep = counter(&bus, PetPath::Collection, true);
        let same_item = counter(&bus, PetPath::Item(1), false);
        let other_item = counter(&bus, PetPath::Item(2), false);

        assert_eq!(bus.notify_change(PetPath::Item(1)), 2);
        assert_eq!(shallow.load(Ordering::SeqCst), 0);
        assert_eq!(deep.load(Ordering::SeqCst), 1);
        assert_eq!(same_item.load(Ordering::SeqCst), 1);
        assert_eq!(other_item.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unregister_stops_delivery() {
        let bus = ChangeBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = bus.register(
            PetPath::Collection,
            true,
            Arc::new(move |changed: PetPath| sink.lock().unwrap().push(changed)),
        );

        bus.notify_change(PetPath::Item(9));
        assert!(bus.unregister(id));
        assert!(!bus.unregister(id));
        bus.notify_change(PetPath::Collection);

        assert_eq!(*seen.lock().unwrap(), vec![PetPath::Item(9)]);
        assert!(bus.is_empty());
    }
}
