//! Typed protocol commands.
//!
//! Every protocol operation has the same shape: encode parameters, submit,
//! wait for the correlated outcome, decode the typed result. [`execute`] is
//! that shape, written once.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    action::Action,
    codec,
    context::Context,
    error::Result,
    method::MethodType,
    traits::Executor,
};

/// A protocol command: its parameters, method name and result type.
pub trait Command: Serialize + Send + Sync {
    /// Method identifier, e.g. `Page.navigate`.
    const METHOD: &'static str;

    /// Decoded result payload.
    type Returns: DeserializeOwned + Send;

    /// The method identifier as a [`MethodType`].
    #[must_use]
    fn method() -> MethodType {
        MethodType::from_static(Self::METHOD)
    }

    /// Wrap this command as an [`Action`] that discards the result.
    #[must_use]
    fn into_action(self) -> CommandAction<Self>
    where
        Self: Sized,
    {
        CommandAction(self)
    }
}

/// Result type for commands whose response carries no fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyReturns {}

/// Run `command` against `executor` and decode its result.
///
/// # Errors
/// - encode/decode errors from the codec boundary
/// - [`Error::Context`](crate::Error::Context) if `ctx` finishes first
/// - [`Error::ChannelClosed`](crate::Error::ChannelClosed),
///   [`Error::Remote`](crate::Error::Remote) or
///   [`Error::UnknownResult`](crate::Error::UnknownResult) as delivered
pub async fn execute<C: Command>(
    ctx: &Context,
    executor: &dyn Executor,
    command: &C,
) -> Result<C::Returns> {
    let params = codec::encode(command)?;
    let outcome = executor.execute(ctx, C::method(), params);
    let raw = outcome.recv(ctx).await?;
    codec::decode(&raw)
}

/// A command used as an [`Action`].
pub struct CommandAction<C>(C);

impl<C> CommandAction<C> {
    /// The wrapped command.
    #[must_use]
    pub const fn command(&self) -> &C {
        &self.0
    }
}

impl<C: fmt::Debug> fmt::Debug for CommandAction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommandAction").field(&self.0).finish()
    }
}

#[async_trait]
impl<C: Command> Action for CommandAction<C> {
    async fn run(&self, ctx: &Context, executor: &dyn Executor) -> Result<()> {
        execute(ctx, executor, &self.0).await.map(drop)
    }
}
