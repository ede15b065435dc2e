//! Shared state and API to handle incoming lines.
//!
//! This module is split in two files:
//!
//! - `mod.rs`: public API of the server state, the registry operations and
//!   the send utilities
//! - `commands.rs`: handlers for the slash commands and channel chat

use crate::channel::Channel;
use crate::client::{Client, ClientStatus, Handle, MessageQueue, MessageQueueItem};
use crate::lines;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;

mod commands;
#[cfg(test)]
mod test;

/// The channel every client is admitted into.
///
/// It exists from startup until the process ends; no operation removes it.
pub const DEFAULT_CHANNEL: &str = "default";

type ChannelMap = BTreeMap<String, Channel>;
type ClientMap = HashMap<Handle, Client>;
type NickMap = HashMap<String, Handle>;
pub(crate) type HandlerResult = Result<(), ()>;

/// State of the chat server.
///
/// This is just an `Arc` to the real data, so it's cheap to clone and clones
/// share the same data.  One lock guards the client table, the channel table
/// and the nickname index together, because every compound operation has to
/// see the three of them move as one step.
///
/// # Example
///
/// ```rust
/// # use palaver::State;
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let state = State::new();
///
/// // The state uses an MPSC queue per client and pushes the messages meant
/// // to be sent to the client onto the queue.
/// let (queue, mut outgoing) = tokio::sync::mpsc::unbounded_channel();
/// let handle = state.peer_joined(queue).await;
///
/// // Admission is announced to everyone, including the new client.
/// let msg = outgoing.recv().await.unwrap();
/// let msg: &str = msg.as_ref();
/// assert_eq!(msg, "0 joined chat\n");
///
/// // Lines that are not slash commands are chat in the current channel.
/// state.handle_message(handle, "hello").await;
/// let msg = outgoing.recv().await.unwrap();
/// let msg: &str = msg.as_ref();
/// assert_eq!(msg, "0: hello\n");
/// # });
/// ```
#[derive(Clone, Default)]
pub struct State(Arc<Mutex<StateInner>>);

impl State {
    pub fn new() -> State {
        State(Arc::new(Mutex::new(StateInner::new())))
    }

    /// Admits a new connection, returning its handle.
    ///
    /// The queue is used to push messages back to the peer.
    pub async fn peer_joined(&self, queue: MessageQueue) -> Handle {
        self.0.lock().await.peer_joined(queue)
    }

    /// Removes the given connection from the state.
    ///
    /// Safe to call after the connection has already been removed, e.g. by a
    /// kick.
    pub async fn peer_quit(&self, handle: Handle) {
        self.0.lock().await.peer_quit(handle)
    }

    /// Updates the state according to the given line from the given client.
    pub async fn handle_message(&self, handle: Handle, line: &str) {
        self.0.lock().await.handle_message(handle, line)
    }
}

/// The actual shared data (state) of the chat server.
///
/// Mutating operations take `&mut self`, so operations that are built out of
/// other operations (`/kick` removes a client, `/join` moves one) compose
/// under the one lock held by [`State`].
pub(crate) struct StateInner {
    /// HashMap to associate the handle of each client with its record.
    clients: ClientMap,

    /// Map from channel name to channel data, ordered by name so listings
    /// come out deterministic.
    channels: ChannelMap,

    /// Nickname index: the other direction of the bijection is the `nick`
    /// field of the client records.
    nicks: NickMap,

    /// Next handle to allocate.  Handles count upward forever; a handle is
    /// never reassigned, even after its connection is gone.
    next_handle: Handle,
}

impl Default for StateInner {
    fn default() -> StateInner {
        StateInner::new()
    }
}

impl StateInner {
    pub fn new() -> StateInner {
        let mut channels = ChannelMap::new();
        channels.insert(DEFAULT_CHANNEL.to_owned(), Channel::new());
        StateInner {
            clients: ClientMap::new(),
            channels,
            nicks: NickMap::new(),
            next_handle: 0,
        }
    }

    /// Admits a connection: allocates a fresh handle, binds the default nick
    /// and puts the client in the default channel, then announces it.
    pub fn peer_joined(&mut self, queue: MessageQueue) -> Handle {
        let handle = self.next_handle;
        self.next_handle += 1;
        let client = Client::new(handle, queue);
        log::debug!("{}: connected", handle);
        self.nicks.insert(client.nick().to_owned(), handle);
        self.channels.get_mut(DEFAULT_CHANNEL).unwrap().add_member(handle);
        self.clients.insert(handle, client);
        self.broadcast_all(lines::joined_chat(handle).into());
        handle
    }

    pub fn peer_quit(&mut self, handle: Handle) {
        log::debug!("{}: disconnected", handle);
        self.remove(handle);
    }

    /// Extracts the client from all three structures and tells the remaining
    /// clients it left.  Idempotent: removing an absent handle is a no-op.
    ///
    /// The client's queue closes when the record is dropped; its connection
    /// task drains what is pending, shuts the socket and exits.
    pub fn remove(&mut self, handle: Handle) {
        let mut client = match self.clients.remove(&handle) {
            Some(client) => client,
            None => return,
        };
        self.nicks.remove(client.nick());
        self.channels.get_mut(client.channel()).unwrap().remove_member(handle);
        client.set_status(ClientStatus::Removed);
        log::debug!("{}: removed as {:?}", client.handle(), client.nick());
        self.broadcast_all(lines::left_chat(client.nick()).into());
    }

    /// Atomically rebinds the client's nickname, returning the previous one.
    ///
    /// Renaming to the current nick is an accepted no-op.  The only refusal
    /// is a nick already bound to another client.
    pub fn rename(&mut self, handle: Handle, new_nick: &str) -> Result<String, ()> {
        if self.clients[&handle].nick() == new_nick {
            return Ok(new_nick.to_owned());
        }
        if self.nicks.contains_key(new_nick) {
            return Err(());
        }
        let old = self.clients.get_mut(&handle).unwrap().set_nick(new_nick.to_owned());
        self.nicks.remove(&old);
        self.nicks.insert(new_nick.to_owned(), handle);
        Ok(old)
    }

    /// Adds an empty channel under the given name.  Returns whether the
    /// channel was created; an existing channel is left untouched.
    pub fn create_channel(&mut self, name: &str) -> bool {
        if self.channels.contains_key(name) {
            return false;
        }
        self.channels.insert(name.to_owned(), Channel::new());
        true
    }

    /// Moves the client to the given channel, returning the channel it came
    /// from.  The target channel must exist.
    pub fn move_to_channel(&mut self, handle: Handle, name: &str) -> Result<String, ()> {
        if !self.channels.contains_key(name) {
            return Err(());
        }
        let old = self.clients.get_mut(&handle).unwrap().set_channel(name.to_owned());
        self.channels.get_mut(&old).unwrap().remove_member(handle);
        self.channels.get_mut(name).unwrap().add_member(handle);
        Ok(old)
    }

    /// Copies out every channel name with its member count, in name order.
    pub fn channel_overview(&self) -> Vec<(String, usize)> {
        self.channels
            .iter()
            .map(|(name, channel)| (name.clone(), channel.members.len()))
            .collect()
    }

    /// Copies out the nicks of the given channel's members, sorted.
    pub fn channel_nicks(&self, name: &str) -> Option<Vec<String>> {
        let channel = self.channels.get(name)?;
        let mut nicks: Vec<String> = channel
            .members
            .iter()
            .map(|member| self.clients[member].nick().to_owned())
            .collect();
        nicks.sort();
        Some(nicks)
    }

    /// Copies out the nicks of all connected clients, sorted.
    pub fn all_nicks(&self) -> Vec<String> {
        let mut nicks: Vec<String> = self
            .clients
            .values()
            .map(|client| client.nick().to_owned())
            .collect();
        nicks.sort();
        nicks
    }
}

// Send utilities
impl StateInner {
    /// Sends the given message to the given client.
    fn send(&self, handle: Handle, msg: MessageQueueItem) {
        if let Some(client) = self.clients.get(&handle) {
            client.send(msg);
        }
    }

    /// Sends the given message to all members of the given channel.
    ///
    /// Membership cannot change mid-broadcast; the caller holds the state
    /// lock for the whole iteration.
    fn broadcast(&self, target: &str, msg: MessageQueueItem) {
        let channel = &self.channels[target];
        for member in &channel.members {
            self.send(*member, msg.clone());
        }
    }

    /// Sends the given message to every connected client.
    fn broadcast_all(&self, msg: MessageQueueItem) {
        for client in self.clients.values() {
            client.send(msg.clone());
        }
    }
}
