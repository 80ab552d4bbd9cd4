//! Capability traits consumed by actions.

use std::sync::Arc;

use crate::{
    codec::RawMessage,
    context::Context,
    event_bus::Subscription,
    method::MethodType,
    outcome::OutcomeReceiver,
};

/// Execution context an action runs against.
///
/// Every executor can submit commands. Event subscription is an optional
/// capability probed through [`Executor::events`].
pub trait Executor: Send + Sync {
    /// Submit a command and return the channel its single outcome arrives on.
    ///
    /// Must not block. The caller races the returned receiver against `ctx`
    /// and may drop it at any time.
    fn execute(&self, ctx: &Context, method: MethodType, params: RawMessage) -> OutcomeReceiver;

    /// The event subscription capability, if this executor has one.
    fn events(&self) -> Option<&dyn EventSubscriber> {
        None
    }
}

/// Register/deregister interest in named protocol events.
///
/// Implementations must allow concurrent `listen` and `release` calls from
/// many tasks.
pub trait EventSubscriber: Send + Sync {
    /// Register interest in `event`.
    ///
    /// The returned subscription receives every later occurrence of `event`
    /// until it is released, with room for one pending notification.
    fn listen(&self, event: &MethodType) -> Subscription;

    /// Deregister a subscription.
    ///
    /// Safe to call after the event has fired or after the subscriber has
    /// already dropped the entry.
    fn release(&self, subscription: Subscription);
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn execute(&self, ctx: &Context, method: MethodType, params: RawMessage) -> OutcomeReceiver {
        (**self).execute(ctx, method, params)
    }

    fn events(&self) -> Option<&dyn EventSubscriber> {
        (**self).events()
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, ctx: &Context, method: MethodType, params: RawMessage) -> OutcomeReceiver {
        (**self).execute(ctx, method, params)
    }

    fn events(&self) -> Option<&dyn EventSubscriber> {
        (**self).events()
    }
}
