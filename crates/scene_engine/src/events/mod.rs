//! Named-event bus for decoupled communication between components
//!
//! One bus is shared by everything built for a scene loader; components reach
//! it through [`ComponentContext::events`](crate::object::ComponentContext::events).
//! Handlers are keyed by event name and receive a JSON payload. A component
//! that subscribes in `on_start` is expected to unsubscribe in `on_destroy`.

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`EventBus::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<RefCell<dyn FnMut(&Value)>>;

/// Event name → ordered handlers
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<HashMap<String, Vec<(SubscriptionId, Handler)>>>,
    next_id: Cell<u64>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        f.debug_struct("EventBus")
            .field("events", &listeners.len())
            .field("handlers", &listeners.values().map(Vec::len).sum::<usize>())
            .finish()
    }
}

impl EventBus {
    /// Empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event`; handlers run in registration order
    pub fn on<F>(&self, event: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: FnMut(&Value) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let handler: Handler = Rc::new(RefCell::new(handler));
        self.listeners
            .borrow_mut()
            .entry(event.into())
            .or_default()
            .push((id, handler));
        id
    }

    /// Remove one subscription. Returns false if it was already gone.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let mut removed = false;
        listeners.retain(|_, handlers| {
            let before = handlers.len();
            handlers.retain(|(handler_id, _)| *handler_id != id);
            removed |= handlers.len() != before;
            !handlers.is_empty()
        });
        removed
    }

    /// Call every handler of `event` with `payload`.
    ///
    /// Handlers may subscribe or unsubscribe while the event is delivered;
    /// changes take effect on the next emit. A handler that emits the event
    /// it is handling is not re-entered. Returns the number of handlers called.
    pub fn emit(&self, event: &str, payload: &Value) -> usize {
        let handlers: Vec<Handler> = match self.listeners.borrow().get(event) {
            Some(handlers) => handlers.iter().map(|(_, h)| Rc::clone(h)).collect(),
            None => return 0,
        };
        let mut called = 0;
        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut handler) => {
                    (&mut *handler)(payload);
                    called += 1;
                }
                Err(_) => log::warn!("Handler for \"{}\" is already running; nested emit skipped", event),
            }
        }
        called
    }

    /// Number of handlers registered for `event`
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.borrow().get(event).map_or(0, Vec::len)
    }

    /// Drop every subscription
    pub fn clear(&self) {
        self.listeners.borrow_mut().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_emit_reaches_handlers_in_order() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b"] {
            let seen = Rc::clone(&seen);
            bus.on("playerDied", move |data| {
                seen.borrow_mut().push(format!("{}:{}", tag, data["score"]));
            });
        }

        assert_eq!(bus.emit("playerDied", &json!({ "score": 100 })), 2);
        assert_eq!(bus.emit("levelWon", &Value::Null), 0);
        assert_eq!(*seen.borrow(), ["a:100", "b:100"]);
    }

    #[test]
    fn test_off_removes_only_that_subscription() {
        let bus = EventBus::new();
        let count = Rc::new(Cell::new(0));
        let first = {
            let count = Rc::clone(&count);
            bus.on("tick", move |_| count.set(count.get() + 1))
        };
        let count_second = Rc::clone(&count);
        bus.on("tick", move |_| count_second.set(count_second.get() + 10));

        assert!(bus.off(first));
        assert!(!bus.off(first));
        bus.emit("tick", &Value::Null);

        assert_eq!(count.get(), 10);
        assert_eq!(bus.listener_count("tick"), 1);
    }

    #[test]
    fn test_handler_may_unsubscribe_during_emit() {
        let bus = Rc::new(EventBus::new());
        let calls = Rc::new(Cell::new(0));
        let id = Rc::new(Cell::new(None));
        let handler_id = {
            let (inner, calls, id) = (Rc::clone(&bus), Rc::clone(&calls), Rc::clone(&id));
            bus.on("once", move |_| {
                calls.set(calls.get() + 1);
                if let Some(id) = id.get() {
                    inner.off(id);
                }
            })
        };
        id.set(Some(handler_id));

        assert_eq!(bus.emit("once", &Value::Null), 1);
        assert_eq!(bus.emit("once", &Value::Null), 0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_nested_emit_skips_running_handler() {
        let bus = Rc::new(EventBus::new());
        let calls = Rc::new(Cell::new(0));
        {
            let (inner, calls) = (Rc::clone(&bus), Rc::clone(&calls));
            bus.on("echo", move |payload| {
                calls.set(calls.get() + 1);
                inner.emit("echo", payload);
            });
        }

        bus.emit("echo", &Value::Null);
        assert_eq!(calls.get(), 1);

        bus.clear();
        assert_eq!(bus.listener_count("echo"), 0);
    }
}
