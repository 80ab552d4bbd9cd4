//! Event subscription table shared by listeners and the event dispatcher.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use serde::de::DeserializeOwned;
use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use crate::{
    codec::{self, RawMessage},
    error::Result,
    method::MethodType,
    traits::EventSubscriber,
};

/// Subscription identifier.
pub type SubscriptionId = Uuid;

/// Default number of pending notifications per subscription.
pub const DEFAULT_EVENT_BUFFER: usize = 1;

/// A protocol event notification.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event name.
    pub method: MethodType,
    /// Encoded event parameters.
    pub params: RawMessage,
}

impl Event {
    /// Create a new event.
    #[must_use]
    pub fn new(method: impl Into<MethodType>, params: RawMessage) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Decode the event parameters.
    ///
    /// # Errors
    /// Returns a decode error if the parameters do not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        codec::decode(&self.params)
    }
}

/// A registered interest in one event name.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    event: MethodType,
    rx: mpsc::Receiver<Event>,
}

impl Subscription {
    /// Assemble a subscription from its parts.
    ///
    /// Used by [`EventSubscriber`] implementations.
    #[must_use]
    pub const fn new(id: SubscriptionId, event: MethodType, rx: mpsc::Receiver<Event>) -> Self {
        Self { id, event, rx }
    }

    /// Subscription identifier.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The event name this subscription listens for.
    #[must_use]
    pub const fn event(&self) -> &MethodType {
        &self.event
    }

    /// Wait for the next notification.
    ///
    /// Returns `None` once the subscriber has dropped this subscription's
    /// entry (for example when the handler shuts down).
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Scoped subscription that releases itself on drop.
///
/// Dropping covers every exit path, including the owning future being
/// dropped while it waits.
pub struct SubscriptionGuard<'a> {
    subscriber: &'a dyn EventSubscriber,
    subscription: Option<Subscription>,
}

impl<'a> SubscriptionGuard<'a> {
    /// Listen for `event` on `subscriber`, releasing when the guard drops.
    #[must_use]
    pub fn listen(subscriber: &'a dyn EventSubscriber, event: &MethodType) -> Self {
        let subscription = subscriber.listen(event);
        Self {
            subscriber,
            subscription: Some(subscription),
        }
    }

    /// Wait for the next notification.
    pub async fn recv(&mut self) -> Option<Event> {
        match self.subscription.as_mut() {
            Some(subscription) => subscription.recv().await,
            None => None,
        }
    }

    /// Release now instead of at drop.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.subscriber.release(subscription);
        }
    }
}

impl Drop for SubscriptionGuard<'_> {
    fn drop(&mut self) {
        self.release_inner();
    }
}

type Subscribers = HashMap<SubscriptionId, mpsc::Sender<Event>>;

#[derive(Default)]
struct Table {
    closed: bool,
    by_event: HashMap<MethodType, Subscribers>,
}

/// Event name to subscriber table.
///
/// All access goes through one internal mutex; callers never see it.
/// Once [`EventBus::close`] has run, new subscriptions are born closed.
pub struct EventBus {
    table: Mutex<Table>,
    buffer: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create a bus with one pending notification per subscription.
    #[must_use]
    pub fn new() -> Self {
        Self::with_buffer(DEFAULT_EVENT_BUFFER)
    }

    /// Create a bus with `buffer` pending notifications per subscription.
    ///
    /// A buffer of zero is raised to one.
    #[must_use]
    pub fn with_buffer(buffer: usize) -> Self {
        Self {
            table: Mutex::new(Table::default()),
            buffer: buffer.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register interest in `event`.
    ///
    /// On a closed bus the subscription's channel is already closed, so its
    /// first `recv` returns `None`.
    #[must_use]
    pub fn listen(&self, event: &MethodType) -> Subscription {
        let (tx, rx) = mpsc::channel(self.buffer);
        let id = Uuid::new_v4();
        {
            let mut table = self.lock();
            if table.closed {
                tracing::trace!(%event, %id, "listen on closed bus");
                drop(tx);
            } else {
                table.by_event.entry(event.clone()).or_default().insert(id, tx);
                tracing::trace!(%event, %id, "listen");
            }
        }
        Subscription::new(id, event.clone(), rx)
    }

    /// Remove a subscription. Releasing an unknown subscription is a no-op.
    pub fn release(&self, subscription: Subscription) {
        let mut table = self.lock();
        if let Some(subscribers) = table.by_event.get_mut(&subscription.event) {
            subscribers.remove(&subscription.id);
            if subscribers.is_empty() {
                table.by_event.remove(&subscription.event);
            }
        }
        tracing::trace!(event = %subscription.event, id = %subscription.id, "release");
    }

    /// Deliver `event` to every subscription for its name.
    ///
    /// A subscription that already has a pending notification misses this
    /// one. Entries whose receiver was dropped without a release are pruned.
    /// Returns the number of subscriptions notified.
    pub fn publish(&self, event: &Event) -> usize {
        let mut table = self.lock();
        let Some(subscribers) = table.by_event.get_mut(&event.method) else {
            return 0;
        };

        let mut delivered = 0;
        subscribers.retain(|id, tx| match tx.try_send(event.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(TrySendError::Full(_)) => {
                tracing::trace!(event = %event.method, %id, "subscriber busy, dropping event");
                true
            }
            Err(TrySendError::Closed(_)) => false,
        });
        if subscribers.is_empty() {
            table.by_event.remove(&event.method);
        }
        delivered
    }

    /// Drop every subscription. Pending waiters observe a closed channel.
    pub fn clear(&self) {
        self.lock().by_event.clear();
    }

    /// Drop every subscription and refuse new ones.
    pub fn close(&self) {
        let mut table = self.lock();
        table.closed = true;
        table.by_event.clear();
    }

    /// Returns true once [`EventBus::close`] has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Total number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().by_event.values().map(HashMap::len).sum()
    }

    /// Number of live subscriptions for `event`.
    #[must_use]
    pub fn subscriber_count_for(&self, event: &MethodType) -> usize {
        self.lock().by_event.get(event).map_or(0, HashMap::len)
    }
}

impl EventSubscriber for EventBus {
    fn listen(&self, event: &MethodType) -> Subscription {
        Self::listen(self, event)
    }

    fn release(&self, subscription: Subscription) {
        Self::release(self, subscription);
    }
}
