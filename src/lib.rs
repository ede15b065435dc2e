//! A small line-based chat server.
//!
//! palaver listens for TCP connections and speaks a newline-delimited UTF-8
//! protocol: plain lines are chat in the sender's current channel, and
//! `/`-prefixed lines are commands (`/nick`, `/msg`, `/mkch`, `/join`,
//! `/list`, `/names`, `/kick`).  Every client sits in exactly one channel at
//! a time and starts out in `default` with its handle as its nickname.
//!
//! All server state lives in [`State`]; the network plumbing in [`net`]
//! feeds it and carries its replies.  Nothing is persisted: a restart
//! forgets everyone.

pub mod config;
pub mod net;

mod channel;
mod client;
mod lines;
mod state;

pub use crate::client::{ClientStatus, Handle, MessageQueue, MessageQueueItem};
pub use crate::config::Config;
pub use crate::state::{State, DEFAULT_CHANNEL};
