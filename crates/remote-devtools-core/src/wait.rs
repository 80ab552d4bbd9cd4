//! Cancellable delay and event-wait actions.

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    action::Action,
    context::Context,
    error::{Error, Result},
    event_bus::SubscriptionGuard,
    method::MethodType,
    traits::Executor,
};

/// Wait for a fixed duration unless the context finishes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sleep {
    duration: Duration,
}

impl Sleep {
    /// Sleep for `duration`.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// The requested duration.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

/// Shorthand for [`Sleep::new`].
#[must_use]
pub const fn sleep(duration: Duration) -> Sleep {
    Sleep::new(duration)
}

#[async_trait]
impl Action for Sleep {
    async fn run(&self, ctx: &Context, _executor: &dyn Executor) -> Result<()> {
        tokio::select! {
            biased;
            err = ctx.done() => Err(err.into()),
            () = tokio::time::sleep(self.duration) => Ok(()),
        }
    }
}

/// Wait for the next occurrence of a named protocol event.
///
/// Needs an executor with event subscriptions; anything else fails at once
/// with [`Error::CapabilityMismatch`]. The subscription is released on every
/// exit path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitEvent {
    event: MethodType,
}

impl WaitEvent {
    /// Wait for `event`.
    #[must_use]
    pub fn new(event: impl Into<MethodType>) -> Self {
        Self {
            event: event.into(),
        }
    }

    /// The awaited event name.
    #[must_use]
    pub const fn event(&self) -> &MethodType {
        &self.event
    }
}

/// Shorthand for [`WaitEvent::new`].
#[must_use]
pub fn wait_event(event: impl Into<MethodType>) -> WaitEvent {
    WaitEvent::new(event)
}

#[async_trait]
impl Action for WaitEvent {
    async fn run(&self, ctx: &Context, executor: &dyn Executor) -> Result<()> {
        let Some(subscriber) = executor.events() else {
            return Err(Error::CapabilityMismatch);
        };

        let mut subscription = SubscriptionGuard::listen(subscriber, &self.event);
        tokio::select! {
            biased;
            err = ctx.done() => Err(err.into()),
            event = subscription.recv() => match event {
                Some(_) => Ok(()),
                None => Err(Error::ChannelClosed),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_err, assert_ok, assert_pending, task};

    use super::*;
    use crate::{
        codec::RawMessage,
        error::ContextError,
        event_bus::{Event, EventBus},
        outcome::OutcomeReceiver,
        traits::EventSubscriber,
    };

    #[derive(Default)]
    struct BusExecutor {
        bus: EventBus,
    }

    impl Executor for BusExecutor {
        fn execute(&self, _ctx: &Context, _method: MethodType, _params: RawMessage) -> OutcomeReceiver {
            OutcomeReceiver::ready(Err(Error::UnknownResult))
        }

        fn events(&self) -> Option<&dyn EventSubscriber> {
            Some(&self.bus)
        }
    }

    struct PlainExecutor;

    impl Executor for PlainExecutor {
        fn execute(&self, _ctx: &Context, _method: MethodType, _params: RawMessage) -> OutcomeReceiver {
            OutcomeReceiver::ready(Err(Error::UnknownResult))
        }
    }

    const LOAD: MethodType = MethodType::from_static("Page.loadEventFired");

    #[tokio::test(start_paused = true)]
    async fn test_sleep_completes() {
        let start = tokio::time::Instant::now();
        assert_ok!(sleep(Duration::from_millis(250)).run(&Context::background(), &PlainExecutor).await);
        assert_eq!(start.elapsed(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_sleep_with_done_context_returns_at_once() {
        let ctx = Context::background();
        ctx.cancel();
        let err = assert_err!(sleep(Duration::from_secs(3600)).run(&ctx, &PlainExecutor).await);
        assert!(matches!(err, Error::Context(ContextError::Canceled)));
    }

    #[tokio::test]
    async fn test_wait_event_requires_subscriptions() {
        let ctx = Context::background();
        let action = wait_event(LOAD);
        let mut fut = task::spawn(action.run(&ctx, &PlainExecutor));
        let err = assert_err!(tokio_test::assert_ready!(fut.poll()));
        assert!(matches!(err, Error::CapabilityMismatch));
    }

    #[tokio::test]
    async fn test_wait_event_ignores_other_events() {
        let executor = BusExecutor::default();
        let ctx = Context::background();
        let action = wait_event(LOAD);
        let mut fut = task::spawn(action.run(&ctx, &executor));

        assert_pending!(fut.poll());
        assert_eq!(executor.bus.subscriber_count_for(&LOAD), 1);

        executor
            .bus
            .publish(&Event::new("Page.frameNavigated", RawMessage::new()));
        assert_pending!(fut.poll());

        executor.bus.publish(&Event::new(LOAD, RawMessage::new()));
        assert!(fut.is_woken());
        assert_ok!(tokio_test::assert_ready!(fut.poll()));
        drop(fut);
        assert_eq!(executor.bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_wait_event_cancel_releases_subscription() {
        let executor = BusExecutor::default();
        let ctx = Context::background();
        let action = wait_event(LOAD);
        let mut fut = task::spawn(action.run(&ctx, &executor));

        assert_pending!(fut.poll());
        assert_eq!(executor.bus.subscriber_count(), 1);

        ctx.cancel();
        assert!(fut.is_woken());
        let err = assert_err!(tokio_test::assert_ready!(fut.poll()));
        assert!(err.is_cancellation());
        assert_eq!(executor.bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_dropping_the_wait_releases_subscription() {
        let executor = BusExecutor::default();
        let ctx = Context::background();
        let action = wait_event(LOAD);
        let mut fut = task::spawn(action.run(&ctx, &executor));

        assert_pending!(fut.poll());
        assert_eq!(executor.bus.subscriber_count(), 1);
        drop(fut);
        assert_eq!(executor.bus.subscriber_count(), 0);
    }
}
