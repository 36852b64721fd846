//! Publish/subscribe bus broadcasts are published on.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use tracing::{error, trace};

use crate::pending::panic_message;
use crate::value::ValueMap;

/// Destination of broadcast notifications.
pub trait EventBus {
    fn publish(&mut self, event: &str, payload: ValueMap);
}

/// Identifies a listener registered on a [`Messenger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ValueMap)>;

/// In-process event bus.
///
/// Listeners of an event run in registration order and share the payload.
/// A panicking listener is reported and does not stop the others.
#[derive(Default)]
pub struct Messenger {
    listeners: BTreeMap<String, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl Messenger {
    /// Bus without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event`.
    pub fn accept(
        &mut self,
        event: impl Into<String>,
        listener: impl FnMut(&ValueMap) + 'static,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners
            .entry(event.into())
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Remove one listener. Returns false if it was not registered.
    pub fn ignore(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        for listeners in self.listeners.values_mut() {
            let before = listeners.len();
            listeners.retain(|(listener_id, _)| *listener_id != id);
            removed |= listeners.len() != before;
        }
        self.listeners.retain(|_, listeners| !listeners.is_empty());
        removed
    }

    /// Remove every listener of `event`, returning how many there were.
    pub fn ignore_all(&mut self, event: &str) -> usize {
        self.listeners.remove(event).map_or(0, |listeners| listeners.len())
    }

    /// Listeners currently registered for `event`.
    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.get(event).map_or(0, Vec::len)
    }
}

impl fmt::Debug for Messenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.listeners
                    .iter()
                    .map(|(event, listeners)| (event, listeners.len())),
            )
            .finish()
    }
}

impl EventBus for Messenger {
    fn publish(&mut self, event: &str, payload: ValueMap) {
        let Some(listeners) = self.listeners.get_mut(event) else {
            trace!(event, "No listeners.");
            return;
        };
        for (id, listener) in listeners.iter_mut() {
            if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| listener(&payload))) {
                error!(
                    event,
                    listener = id.0,
                    panic = %panic_message(&*panic),
                    "Event listener panicked."
                );
            }
        }
    }
}
