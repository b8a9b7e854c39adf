// Event broadcaster - synchronous, in-process, ordered dispatch

use super::Event;
use anyhow::{Context, Result};
use std::cell::RefCell;
use std::rc::Rc;

/// Subscriber to the lifecycle event stream
pub trait EventListener {
    /// Called for every emitted event, in emission order
    fn on_event(&mut self, event: &Event) -> Result<()>;
}

/// Listener handle shared between the broadcaster and its owner
pub type SharedListener = Rc<RefCell<dyn EventListener>>;

/// Dispatches each event to every listener in registration order.
///
/// Delivery is synchronous and single-threaded; a listener must not emit
/// from inside `on_event`.
#[derive(Default)]
pub struct EventBroadcaster {
    listeners: Vec<SharedListener>,
}

impl EventBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: SharedListener) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver `event` to all listeners. Stops at the first listener error.
    pub fn emit(&self, event: &Event) -> Result<()> {
        for (position, listener) in self.listeners.iter().enumerate() {
            listener
                .borrow_mut()
                .on_event(event)
                .with_context(|| format!("listener #{} failed on {}", position, event.kind()))?;
        }
        Ok(())
    }

    pub fn emit_all<'a>(&self, events: impl IntoIterator<Item = &'a Event>) -> Result<()> {
        for event in events {
            self.emit(event)?;
        }
        Ok(())
    }
}
