//! Single-use outcome channel for one command invocation.
//!
//! Each invocation gets exactly one [`OutcomeSender`] (held by the producer,
//! usually the handler's reader loop) and one [`OutcomeReceiver`] (held by the
//! caller). Both halves are consumed on use, so at most one value is ever
//! delivered and at most one wait ever happens.
//!
//! Dropping the receiver abandons the invocation; a later `deliver` returns
//! `false` immediately and the value is discarded. Dropping the sender without
//! delivering closes the channel, which the receiver reports as
//! [`Error::ChannelClosed`].

use tokio::sync::oneshot;

use crate::{
    codec::RawMessage,
    context::Context,
    error::{Error, Result},
};

/// Terminal value of an invocation: an encoded result or a failure.
pub type Outcome = Result<RawMessage>;

/// Create a linked sender/receiver pair.
#[must_use]
pub fn channel() -> (OutcomeSender, OutcomeReceiver) {
    let (tx, rx) = oneshot::channel();
    (OutcomeSender { tx }, OutcomeReceiver { rx })
}

/// Producing half of an outcome channel.
#[derive(Debug)]
pub struct OutcomeSender {
    tx: oneshot::Sender<Outcome>,
}

impl OutcomeSender {
    /// Deliver the outcome. Never blocks.
    ///
    /// Returns `false` if the receiver was already dropped, in which case the
    /// outcome is discarded.
    pub fn deliver(self, outcome: Outcome) -> bool {
        self.tx.send(outcome).is_ok()
    }

    /// Returns true if the receiver has been dropped.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consuming half of an outcome channel.
#[derive(Debug)]
pub struct OutcomeReceiver {
    rx: oneshot::Receiver<Outcome>,
}

impl OutcomeReceiver {
    /// A receiver that is already resolved with `outcome`.
    ///
    /// Useful for executors that can fail a submission synchronously.
    #[must_use]
    pub fn ready(outcome: Outcome) -> Self {
        let (tx, rx) = channel();
        tx.deliver(outcome);
        rx
    }

    /// Wait for the outcome or for `ctx` to finish, whichever comes first.
    ///
    /// A context that is already done wins over a value that is already
    /// waiting. On cancellation the receiver is dropped, so any late delivery
    /// is discarded by the producer without blocking.
    ///
    /// # Errors
    /// - [`Error::Context`] if `ctx` finished first.
    /// - [`Error::ChannelClosed`] if the producer went away without a value.
    /// - Whatever failure the producer delivered.
    pub async fn recv(self, ctx: &Context) -> Result<RawMessage> {
        let mut rx = self.rx;
        tokio::select! {
            biased;
            err = ctx.done() => Err(Error::Context(err)),
            res = &mut rx => match res {
                Ok(outcome) => outcome,
                Err(_) => Err(Error::ChannelClosed),
            },
        }
    }
}
