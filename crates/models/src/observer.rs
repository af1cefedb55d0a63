//! Synchronous publish/subscribe registry used by the models.
//!
//! The registry only keeps weak references to its callbacks. A subscriber
//! owns its callback through the returned [`Subscription`]; dropping it stops
//! delivery before the next notification.

use std::{
    any::Any,
    cell::RefCell,
    rc::{Rc, Weak},
};

use shared::protocol::UpdateKind;

type Callback<E> = Box<dyn Fn(UpdateKind, &E)>;

/// Keeps a subscriber's callback alive.
#[must_use = "dropping a Subscription unsubscribes the callback"]
pub struct Subscription {
    _callback: Rc<dyn Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

pub struct Observers<E: 'static> {
    slots: RefCell<Vec<Weak<Callback<E>>>>,
}

impl<E: 'static> Default for Observers<E> {
    fn default() -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
        }
    }
}

impl<E: 'static> Observers<E> {
    pub fn subscribe(&self, callback: impl Fn(UpdateKind, &E) + 'static) -> Subscription {
        let callback: Rc<Callback<E>> = Rc::new(Box::new(callback));
        self.slots.borrow_mut().push(Rc::downgrade(&callback));
        Subscription {
            _callback: callback,
        }
    }

    /// Invokes every live callback in registration order. Callbacks may
    /// subscribe or read the model; new subscribers are not called for the
    /// notification in flight.
    pub fn notify(&self, update: UpdateKind, event: &E) {
        let live: Vec<Rc<Callback<E>>> = {
            let mut slots = self.slots.borrow_mut();
            slots.retain(|slot| slot.strong_count() > 0);
            slots.iter().filter_map(Weak::upgrade).collect()
        };
        for callback in live {
            callback(update, event);
        }
    }

    pub fn len(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .filter(|slot| slot.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn notifies_in_registration_order() {
        let observers = Observers::<u32>::default();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first_log = Rc::clone(&log);
        let _first = observers.subscribe(move |update, value| {
            first_log.borrow_mut().push(("first", update, *value));
        });
        let second_log = Rc::clone(&log);
        let _second = observers.subscribe(move |update, value| {
            second_log.borrow_mut().push(("second", update, *value));
        });

        observers.notify(UpdateKind::Minor, &7);

        assert_eq!(
            *log.borrow(),
            vec![
                ("first", UpdateKind::Minor, 7),
                ("second", UpdateKind::Minor, 7)
            ]
        );
    }

    #[test]
    fn dropped_subscription_stops_delivery() {
        let observers = Observers::<u32>::default();
        let hits = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&hits);
        let subscription = observers.subscribe(move |_, _| *counter.borrow_mut() += 1);
        observers.notify(UpdateKind::Patch, &1);
        assert_eq!(observers.len(), 1);

        drop(subscription);
        observers.notify(UpdateKind::Patch, &2);

        assert_eq!(*hits.borrow(), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn callback_may_subscribe_during_notification() {
        let observers = Rc::new(Observers::<u32>::default());
        let late = Rc::new(RefCell::new(Vec::new()));

        let registry = Rc::clone(&observers);
        let keep = Rc::clone(&late);
        let _outer = observers.subscribe(move |_, _| {
            keep.borrow_mut().push(registry.subscribe(|_, _| {}));
        });

        observers.notify(UpdateKind::Major, &0);
        assert_eq!(late.borrow().len(), 1);
        assert_eq!(observers.len(), 2);
    }
}
