//! Callback registration for simulation events
//!
//! Observers register a boxed callback and receive a [`SubscriptionId`]
//! that later removes it. Delivery is immediate and happens on the
//! simulation thread, in registration order.

use std::fmt;

/// Handle returned by [`Subscribers::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Raw numeric value of this handle
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Boxed event callback
pub type Callback<E> = Box<dyn FnMut(&E)>;

/// Ordered set of callbacks interested in events of type `E`
pub struct Subscribers<E> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Callback<E>)>,
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.handlers.len())
            .finish()
    }
}

impl<E> Subscribers<E> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }

    /// Register a callback
    pub fn subscribe(&mut self, callback: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback; returns false if the handle was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        before != self.handlers.len()
    }

    /// Deliver an event to every callback
    pub fn emit(&mut self, event: &E) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no callback is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Remove every callback
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subscribers = Subscribers::<u32>::new();

        let first = Rc::clone(&log);
        subscribers.subscribe(move |value| first.borrow_mut().push(("first", *value)));
        let second = Rc::clone(&log);
        subscribers.subscribe(move |value| second.borrow_mut().push(("second", *value)));

        subscribers.emit(&7);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_unsubscribe() {
        let hits = Rc::new(RefCell::new(0));
        let mut subscribers = Subscribers::<()>::new();
        let counter = Rc::clone(&hits);
        let id = subscribers.subscribe(move |()| *counter.borrow_mut() += 1);

        subscribers.emit(&());
        assert!(subscribers.unsubscribe(id));
        assert!(!subscribers.unsubscribe(id));
        subscribers.emit(&());

        assert_eq!(*hits.borrow(), 1);
        assert!(subscribers.is_empty());
    }
}
