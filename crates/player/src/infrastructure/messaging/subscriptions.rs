//! Subscription registry: at most one reaction per message discriminant.
//!
//! Registering again for the same [`MessageKind`] replaces the earlier
//! callback. Callbacks run synchronously on the dispatch path, after the store
//! has been updated for the message.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use mafen_protocol::{MessageKind, ServerMessage};

/// A registered reaction to one kind of server message
pub type Subscriber = Arc<dyn Fn(&ServerMessage) + Send + Sync + 'static>;

#[derive(Default)]
pub struct Subscriptions {
    handlers: Mutex<HashMap<MessageKind, Subscriber>>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the reaction for `kind`.
    ///
    /// Returns `true` if a previous registration was replaced.
    pub fn on(
        &self,
        kind: MessageKind,
        callback: impl Fn(&ServerMessage) + Send + Sync + 'static,
    ) -> bool {
        let replaced = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, Arc::new(callback))
            .is_some();
        if replaced {
            tracing::debug!(action = %kind, "Replaced subscriber");
        }
        replaced
    }

    /// The current reaction for `kind`.
    ///
    /// Cloned out so the registry lock is not held while it runs.
    pub fn handler(&self, kind: MessageKind) -> Option<Subscriber> {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned()
    }

    /// Invoke the reaction registered for this message's kind, if any.
    pub fn notify(&self, message: &ServerMessage) -> bool {
        let Some(handler) = message.kind().and_then(|kind| self.handler(kind)) else {
            return false;
        };
        handler(message);
        true
    }

    pub fn clear(&self) {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn second_registration_replaces_first() {
        let subscriptions = Subscriptions::new();
        let first = Arc::new(AtomicU32::new(0));
        let second = Arc::new(AtomicU32::new(0));

        let first_clone = Arc::clone(&first);
        assert!(!subscriptions.on(MessageKind::Character, move |_| {
            first_clone.fetch_add(1, Ordering::SeqCst);
        }));
        let second_clone = Arc::clone(&second);
        assert!(subscriptions.on(MessageKind::Character, move |_| {
            second_clone.fetch_add(1, Ordering::SeqCst);
        }));

        subscriptions.notify(&ServerMessage::Character { name: "Bob".into() });

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(subscriptions.len(), 1);
    }

    #[test]
    fn only_matching_kind_fires() {
        let subscriptions = Subscriptions::new();
        let count = Arc::new(AtomicU32::new(0));

        let count_clone = Arc::clone(&count);
        subscriptions.on(MessageKind::Meter, move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!subscriptions.notify(&ServerMessage::Character { name: "Bob".into() }));
        assert!(!subscriptions.notify(&ServerMessage::Unknown));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clear_drops_every_registration() {
        let subscriptions = Subscriptions::new();
        subscriptions.on(MessageKind::Msg, |_| {});
        subscriptions.on(MessageKind::Item, |_| {});
        subscriptions.clear();
        assert!(subscriptions.is_empty());
    }
}
