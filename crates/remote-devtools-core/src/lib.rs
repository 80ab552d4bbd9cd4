//! Command execution and action composition core for remote debugging
//! protocol clients.
//!
//! This crate provides:
//! - `Context` - Cancellation and deadline scope for every wait
//! - `Executor` / `EventSubscriber` - Capabilities an action runs against
//! - `outcome` - Single-use outcome channel for one command
//! - `EventBus` - Shared event subscription table
//! - `Action`, `Tasks`, `Sleep`, `WaitEvent` - Composable units of work
//! - `Command` / `execute` - Typed command helper

pub mod action;
pub mod codec;
pub mod command;
pub mod context;
pub mod error;
pub mod event_bus;
pub mod method;
pub mod outcome;
pub mod traits;
pub mod wait;

pub use action::{Action, ActionFn, Tasks, action_fn};
pub use codec::RawMessage;
pub use command::{Command, CommandAction, EmptyReturns, execute};
pub use context::Context;
pub use error::{ContextError, Error, RemoteError, Result};
pub use event_bus::{Event, EventBus, Subscription, SubscriptionGuard, SubscriptionId};
pub use method::MethodType;
pub use outcome::{OutcomeReceiver, OutcomeSender};
pub use traits::{EventSubscriber, Executor};
pub use wait::{Sleep, WaitEvent, sleep, wait_event};
