//! A single-value observable cell.
//!
//! [`State`] notifies its subscribers synchronously, in subscription order,
//! whenever [`State::set`] stores a value that differs from the current one.
//! There is no batching: a subscriber that calls `set` again recurses.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

/// Identifies a subscriber so it can later be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Subscriber<T> = Rc<dyn Fn(&T)>;

struct Inner<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<(Subscription, Subscriber<T>)>>,
    next_id: Cell<u64>,
}

/// A reactive state container.
///
/// Cloning a `State` yields another handle to the same cell.
///
/// # Examples
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
/// use trellis_core::State;
///
/// let count = State::new(0);
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// count.subscribe(move |v| sink.borrow_mut().push(*v));
///
/// count.set(1);
/// count.set(1);
/// count.set(2);
/// assert_eq!(*seen.borrow(), vec![1, 2]);
/// ```
pub struct State<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for State<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("value", &self.inner.value.borrow())
            .field("subscribers", &self.inner.subscribers.borrow().len())
            .finish()
    }
}

impl<T: Default + 'static> Default for State<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: 'static> State<T> {
    /// Creates a cell holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(initial),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Borrows the current value.
    ///
    /// # Panics
    ///
    /// Panics if called from inside [`State::update`]'s closure on the same cell.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Registers a subscriber. It is not called with the current value.
    pub fn subscribe(&self, subscriber: impl Fn(&T) + 'static) -> Subscription {
        let id = Subscription(self.inner.next_id.get());
        self.inner.next_id.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));
        id
    }

    /// Removes a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|(id, _)| *id != subscription);
        subscribers.len() != before
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    /// Returns `true` if both handles point at the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self, value: &T) {
        // Snapshot so subscribers may (un)subscribe or set while we iterate.
        let subscribers: Vec<Subscriber<T>> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| Rc::clone(subscriber))
            .collect();
        for subscriber in subscribers {
            subscriber(value);
        }
    }
}

impl<T: Clone + 'static> State<T> {
    /// Returns a copy of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }
}

impl<T: Clone + PartialEq + 'static> State<T> {
    /// Stores `value` and notifies subscribers, unless it equals the current value.
    ///
    /// Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return false;
            }
            current.clone_from(&value);
        }
        self.notify(&value);
        true
    }

    /// Derives the next value from the current one and [`set`](Self::set)s it.
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> bool {
        let next = f(&self.inner.value.borrow());
        self.set(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn recorder<T: Clone + 'static>(state: &State<T>) -> Rc<RefCell<Vec<T>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        state.subscribe(move |v: &T| sink.borrow_mut().push(v.clone()));
        seen
    }

    #[test]
    fn equal_values_do_not_notify() {
        let state = State::new(String::from("a"));
        let seen = recorder(&state);

        assert!(!state.set(String::from("a")));
        assert!(state.set(String::from("b")));
        assert_eq!(*seen.borrow(), vec![String::from("b")]);
        assert_eq!(state.get(), "b");
    }

    #[test]
    fn subscribers_run_in_subscription_order() {
        let state = State::new(0);
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            state.subscribe(move |_| order.borrow_mut().push(tag));
        }

        state.set(1);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let state = State::new(0);
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let id = state.subscribe(move |_| counter.set(counter.get() + 1));

        state.set(1);
        assert!(state.unsubscribe(id));
        assert!(!state.unsubscribe(id));
        state.set(2);
        assert_eq!(seen.get(), 1);
        assert_eq!(state.subscriber_count(), 0);
    }

    #[test]
    fn subscriber_may_set_recursively() {
        let state = State::new(0);
        let handle = state.clone();
        state.subscribe(move |v| {
            if *v < 3 {
                handle.set(v + 1);
            }
        });
        let seen = recorder(&state);

        state.set(1);
        assert_eq!(state.get(), 3);
        // Inner notifications complete before the outer pass reaches later subscribers.
        assert_eq!(*seen.borrow(), vec![3, 2, 1]);
    }

    #[test]
    fn subscriber_added_during_notification_waits_for_next_change() {
        let state = State::new(0);
        let late = Rc::new(Cell::new(0));
        let handle = state.clone();
        let late_counter = Rc::clone(&late);
        state.subscribe(move |_| {
            let counter = Rc::clone(&late_counter);
            handle.subscribe(move |_| counter.set(counter.get() + 1));
        });

        state.set(1);
        assert_eq!(late.get(), 0);
        state.set(2);
        assert_eq!(late.get(), 1);
    }

    #[test]
    fn update_derives_from_current() {
        let state = State::new(vec![1, 2]);
        let seen = recorder(&state);
        state.update(|v| v.iter().map(|x| x * 10).collect());
        assert_eq!(*seen.borrow(), vec![vec![10, 20]]);
    }

    proptest! {
        #[test]
        fn notifies_exactly_on_change(initial in 0u8..4, writes in proptest::collection::vec(0u8..4, 0..40)) {
            let state = State::new(initial);
            let seen = recorder(&state);

            let mut expected = Vec::new();
            let mut previous = initial;
            for value in &writes {
                state.set(*value);
                if *value != previous {
                    expected.push(*value);
                    previous = *value;
                }
            }

            prop_assert_eq!(seen.borrow().clone(), expected);
            prop_assert_eq!(state.get(), previous);
        }
    }
}
