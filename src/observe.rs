//! Synchronous, single-threaded notification plumbing.
//!
//! An [`EventHub`] fans one event out to every registered listener on the
//! calling thread before `emit` returns. Registration hands back a scoped
//! [`Subscription`]: dropping it removes the listener, so whoever holds the
//! guard controls the listener's lifetime.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

/// Identifier of one listener registration inside a hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

type Listener<E> = Rc<dyn Fn(&E)>;

struct ListenerTable<E> {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<E>)>,
}

trait Detach {
    fn detach(&self, id: SubscriptionId) -> bool;
}

impl<E> Detach for RefCell<ListenerTable<E>> {
    fn detach(&self, id: SubscriptionId) -> bool {
        let mut table = self.borrow_mut();
        let Some(index) = table.listeners.iter().position(|(entry, _)| *entry == id) else {
            return false;
        };
        table.listeners.remove(index);
        true
    }
}

/// Ordered list of listeners for one kind of event.
pub struct EventHub<E> {
    table: Rc<RefCell<ListenerTable<E>>>,
}

impl<E: 'static> EventHub<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Rc::new(RefCell::new(ListenerTable {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Registers `listener`; it stays registered until the returned guard is
    /// dropped or the hub itself goes away.
    #[must_use = "dropping the subscription unregisters the listener immediately"]
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let id = {
            let mut table = self.table.borrow_mut();
            let id = SubscriptionId(table.next_id);
            table.next_id = table.next_id.wrapping_add(1);
            table.listeners.push((id, Rc::new(listener)));
            id
        };
        let table: Rc<RefCell<ListenerTable<E>>> = Rc::clone(&self.table);
        let weak: Weak<dyn Detach> = Rc::downgrade(&table) as Weak<dyn Detach>;
        Subscription {
            id,
            table: Some(weak),
        }
    }

    /// Delivers `event` to listeners in registration order.
    ///
    /// The listener list is snapshotted first, so listeners may subscribe or
    /// unsubscribe while being notified without affecting this delivery.
    pub fn emit(&self, event: &E) {
        let snapshot: SmallVec<[Listener<E>; 4]> = self
            .table
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.table.borrow().listeners.len()
    }
}

impl<E: 'static> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventHub<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("listeners", &self.table.borrow().listeners.len())
            .finish()
    }
}

/// Scoped listener registration. Dropping it unregisters the listener.
pub struct Subscription {
    id: SubscriptionId,
    table: Option<Weak<dyn Detach>>,
}

impl Subscription {
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// `true` while the listener is still registered with a live hub.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.table.as_ref().is_some_and(|table| table.strong_count() > 0)
    }

    /// Unregisters the listener now. Equivalent to dropping the guard.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(table) = self.table.take().and_then(|weak| weak.upgrade()) {
            table.detach(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::EventHub;

    #[test]
    fn listeners_run_in_registration_order() {
        let hub = EventHub::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let first = {
            let seen = Rc::clone(&seen);
            hub.subscribe(move |value| seen.borrow_mut().push(("first", *value)))
        };
        let second = {
            let seen = Rc::clone(&seen);
            hub.subscribe(move |value| seen.borrow_mut().push(("second", *value)))
        };

        hub.emit(&7);

        assert_eq!(*seen.borrow(), vec![("first", 7), ("second", 7)]);
        drop((first, second));
    }

    #[test]
    fn dropping_subscription_unregisters_listener() {
        let hub = EventHub::<()>::new();
        let hits = Rc::new(Cell::new(0));
        let subscription = {
            let hits = Rc::clone(&hits);
            hub.subscribe(move |_| hits.set(hits.get() + 1))
        };

        hub.emit(&());
        drop(subscription);
        hub.emit(&());

        assert_eq!(hits.get(), 1);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn subscription_outliving_hub_is_inactive() {
        let hub = EventHub::<()>::new();
        let subscription = hub.subscribe(|_| {});
        assert!(subscription.is_active());
        drop(hub);
        assert!(!subscription.is_active());
        subscription.unsubscribe();
    }

    #[test]
    fn listener_may_unsubscribe_itself_during_emit() {
        let hub = Rc::new(EventHub::<()>::new());
        let slot = Rc::new(RefCell::new(None));
        let hits = Rc::new(Cell::new(0));
        let subscription = {
            let slot = Rc::clone(&slot);
            let hits = Rc::clone(&hits);
            hub.subscribe(move |_| {
                hits.set(hits.get() + 1);
                slot.borrow_mut().take();
            })
        };
        *slot.borrow_mut() = Some(subscription);

        hub.emit(&());
        hub.emit(&());

        assert_eq!(hits.get(), 1);
        assert_eq!(hub.listener_count(), 0);
    }
}
