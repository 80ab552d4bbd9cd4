//! Actions and the sequential task list.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::{context::Context, error::Result, traits::Executor};

/// A unit of work run against an executor.
///
/// Actions hold no state beyond what they capture and may be run more than
/// once; whether that is meaningful is up to the action.
#[async_trait]
pub trait Action: Send + Sync {
    /// Run the action.
    ///
    /// # Errors
    /// Returns whatever the action's commands or waits fail with, including
    /// the context error if `ctx` finishes first.
    async fn run(&self, ctx: &Context, executor: &dyn Executor) -> Result<()>;
}

#[async_trait]
impl<A: Action + ?Sized> Action for Box<A> {
    async fn run(&self, ctx: &Context, executor: &dyn Executor) -> Result<()> {
        (**self).run(ctx, executor).await
    }
}

#[async_trait]
impl<A: Action + ?Sized> Action for Arc<A> {
    async fn run(&self, ctx: &Context, executor: &dyn Executor) -> Result<()> {
        (**self).run(ctx, executor).await
    }
}

#[async_trait]
impl<'r, A: Action + ?Sized> Action for &'r A {
    async fn run(&self, ctx: &Context, executor: &dyn Executor) -> Result<()> {
        (**self).run(ctx, executor).await
    }
}

/// Adapter turning a plain function into an [`Action`].
///
/// ```ignore
/// let noop = action_fn(|_ctx, _executor| async { Ok(()) }.boxed());
/// ```
pub struct ActionFn<F>(F);

impl<F> ActionFn<F>
where
    F: for<'a> Fn(&'a Context, &'a dyn Executor) -> BoxFuture<'a, Result<()>> + Send + Sync,
{
    /// Wrap `f`.
    #[must_use]
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Action for ActionFn<F>
where
    F: for<'a> Fn(&'a Context, &'a dyn Executor) -> BoxFuture<'a, Result<()>> + Send + Sync,
{
    async fn run(&self, ctx: &Context, executor: &dyn Executor) -> Result<()> {
        (self.0)(ctx, executor).await
    }
}

impl<F> fmt::Debug for ActionFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActionFn")
    }
}

/// Wrap a function as an [`Action`].
#[must_use]
pub const fn action_fn<F>(f: F) -> ActionFn<F>
where
    F: for<'a> Fn(&'a Context, &'a dyn Executor) -> BoxFuture<'a, Result<()>> + Send + Sync,
{
    ActionFn::new(f)
}

/// Ordered list of actions that runs as a single action.
///
/// Actions run one after another with the same context. The first failure
/// stops the list and is returned; earlier actions are not undone.
///
/// By default no per-action deadline is derived; every action sees the
/// aggregate context. [`Tasks::with_action_timeout`] opts in to bounding each
/// action separately.
#[derive(Default)]
pub struct Tasks {
    actions: Vec<Box<dyn Action>>,
    action_timeout: Option<Duration>,
}

impl Tasks {
    /// Create an empty task list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action.
    pub fn push(&mut self, action: impl Action + 'static) {
        self.actions.push(Box::new(action));
    }

    /// Append an action, builder style.
    #[must_use]
    pub fn then(mut self, action: impl Action + 'static) -> Self {
        self.push(action);
        self
    }

    /// Run every action under its own deadline of at most `timeout`.
    ///
    /// The aggregate deadline still applies when it is earlier.
    #[must_use]
    pub const fn with_action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = Some(timeout);
        self
    }

    /// The per-action timeout, if one was set.
    #[must_use]
    pub const fn action_timeout(&self) -> Option<Duration> {
        self.action_timeout
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns true if there are no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Debug for Tasks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tasks")
            .field("len", &self.actions.len())
            .field("action_timeout", &self.action_timeout)
            .finish()
    }
}

impl From<Vec<Box<dyn Action>>> for Tasks {
    fn from(actions: Vec<Box<dyn Action>>) -> Self {
        Self {
            actions,
            action_timeout: None,
        }
    }
}

impl FromIterator<Box<dyn Action>> for Tasks {
    fn from_iter<I: IntoIterator<Item = Box<dyn Action>>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl Extend<Box<dyn Action>> for Tasks {
    fn extend<I: IntoIterator<Item = Box<dyn Action>>>(&mut self, iter: I) {
        self.actions.extend(iter);
    }
}

#[async_trait]
impl Action for Tasks {
    async fn run(&self, ctx: &Context, executor: &dyn Executor) -> Result<()> {
        let total = self.actions.len();
        for (index, action) in self.actions.iter().enumerate() {
            tracing::trace!(index, total, "running task");
            let result = match self.action_timeout {
                Some(timeout) => action.run(&ctx.with_timeout(timeout), executor).await,
                None => action.run(ctx, executor).await,
            };
            if let Err(err) = result {
                tracing::debug!(index, total, error = %err, "task failed, aborting sequence");
                return Err(err);
            }
        }
        Ok(())
    }
}
