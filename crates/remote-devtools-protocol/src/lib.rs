//! Wire frames and domain commands for the remote debugging protocol.
//!
//! Provides:
//! - Frame encoding and inbound classification (`message`)
//! - `Page` and `Storage` domain commands and event names

pub mod message;
pub mod page;
pub mod storage;

pub use message::{Inbound, Message, MessageId, Request};
