//! Target handler for the remote debugging protocol.
//!
//! Provides:
//! - `TargetHandler` - An `Executor` with event subscriptions over a
//!   newline-delimited JSON stream
//! - `HandlerConfig` - Handler tunables

pub mod config;
pub mod handler;

pub use config::HandlerConfig;
pub use handler::{HandlerError, TargetHandler};
