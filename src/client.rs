//! Client data and the queue that carries lines back to its socket.

use crate::state::DEFAULT_CHANNEL;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Identifies a connection for the lifetime of the server.
///
/// Handles are allocated upward from zero at accept time and never reused,
/// even after the connection is gone.
pub type Handle = u64;

/// Sending end of a client's message queue.
///
/// The connection's own task owns the receiving end and drains it onto the
/// socket, so pushing a message never blocks on client I/O.
pub type MessageQueue = mpsc::UnboundedSender<MessageQueueItem>;

/// A framed outbound message, cheap to clone across a broadcast.
///
/// The payload is UTF-8 and ends with `\n`.  A payload with embedded
/// newlines is delivered as that many lines.
#[derive(Clone, Debug)]
pub struct MessageQueueItem(Arc<str>);

impl From<String> for MessageQueueItem {
    fn from(mut line: String) -> MessageQueueItem {
        if !line.ends_with('\n') {
            line.push('\n');
        }
        MessageQueueItem(Arc::from(line))
    }
}

impl From<&str> for MessageQueueItem {
    fn from(line: &str) -> MessageQueueItem {
        MessageQueueItem::from(line.to_owned())
    }
}

impl AsRef<str> for MessageQueueItem {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<[u8]> for MessageQueueItem {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Where a client is in its lifecycle.
///
/// `Inactive` is the transient state between an administrative kick and the
/// removal of the record; `Removed` is terminal and means the record has been
/// extracted from the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClientStatus {
    Active,
    Inactive,
    Removed,
}

/// Client data.
pub struct Client {
    handle: Handle,
    queue: MessageQueue,
    nick: String,
    channel: String,
    status: ClientStatus,
}

impl Client {
    /// Initializes the client data with the given handle and queue.
    ///
    /// The nickname starts as the decimal form of the handle and the client
    /// starts in the default channel.
    pub fn new(handle: Handle, queue: MessageQueue) -> Client {
        Client {
            handle,
            queue,
            nick: handle.to_string(),
            channel: DEFAULT_CHANNEL.to_owned(),
            status: ClientStatus::Active,
        }
    }

    /// Pushes a message onto the client's queue.
    ///
    /// A closed queue means the connection's task has already gone; the
    /// message is dropped and the registry cleanup follows on its own.
    pub fn send(&self, msg: MessageQueueItem) {
        let _ = self.queue.send(msg);
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Replaces the nickname, returning the previous one.
    pub fn set_nick(&mut self, nick: String) -> String {
        std::mem::replace(&mut self.nick, nick)
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Replaces the channel, returning the previous one.
    pub fn set_channel(&mut self, channel: String) -> String {
        std::mem::replace(&mut self.channel, channel)
    }

    pub fn status(&self) -> ClientStatus {
        self.status
    }

    pub fn set_status(&mut self, status: ClientStatus) {
        self.status = status;
    }
}
