use std::cell::Cell;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// An event type that can travel over an [`EventBus`].
///
/// `Kind` is the name listeners subscribe to; one kind may carry many payloads.
pub trait BusEvent: Send + Sync + 'static {
    /// Listener key for this event type.
    type Kind: Copy + Eq + Hash + Send + Sync + 'static;

    /// Kind of this particular event value.
    fn kind(&self) -> Self::Kind;
}

/// Opaque handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// What a listener sees during dispatch.
///
/// Listeners may call [`Emission::prevent_default`]; the emitter learns about it from the
/// return value of [`EventBus::emit`].
pub struct Emission<'a, E> {
    event: &'a E,
    default_prevented: Cell<bool>,
}

impl<'a, E> Emission<'a, E> {
    /// The event payload.
    pub fn event(&self) -> &'a E {
        self.event
    }

    /// Ask the emitter to skip its default action for this event.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether any listener so far called [`Emission::prevent_default`].
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

type Listener<E> = Arc<dyn Fn(&Emission<'_, E>) + Send + Sync>;

/// Typed publish/subscribe bus.
///
/// Dispatch works on a snapshot of the listener list taken when `emit` is called: listeners
/// added or removed by a listener only affect later emissions. Listeners run on the emitting
/// thread, in subscription order.
pub struct EventBus<E: BusEvent> {
    listeners: Mutex<HashMap<E::Kind, Vec<(ListenerId, Listener<E>)>>>,
    next_id: AtomicU64,
}

impl<E: BusEvent> EventBus<E> {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            listeners: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register `listener` for events of `kind`.
    pub fn subscribe<F>(&self, kind: E::Kind, listener: F) -> ListenerId
    where
        F: Fn(&Emission<'_, E>) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut map = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for stack in map.values_mut() {
            if let Some(pos) = stack.iter().position(|(lid, _)| *lid == id) {
                stack.remove(pos);
                return true;
            }
        }
        false
    }

    /// Number of listeners currently registered for `kind`.
    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Deliver `event` to every listener of its kind.
    ///
    /// Returns `true` unless a listener prevented the default action.
    pub fn emit(&self, event: &E) -> bool {
        let snapshot: Vec<Listener<E>> = {
            let map = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
            match map.get(&event.kind()) {
                Some(stack) => stack.iter().map(|(_, l)| Arc::clone(l)).collect(),
                None => return true,
            }
        };

        let emission = Emission {
            event,
            default_prevented: Cell::new(false),
        };
        for listener in snapshot {
            listener(&emission);
        }
        !emission.default_prevented()
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/events/bus.rs"]
mod tests;
