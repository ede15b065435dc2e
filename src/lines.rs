//! Every line the server sends, in one place.
//!
//! Nothing here appends the trailing newline; framing happens when a line is
//! turned into a `MessageQueueItem`.

use crate::client::Handle;

pub const INVALID_COMMAND: &str = "invalid command";
pub const CHANNEL_LIST_HEADER: &str = "*** Channel\tUsers";

pub fn joined_chat(handle: Handle) -> String {
    format!("{} joined chat", handle)
}

pub fn left_chat(nick: &str) -> String {
    format!("{} left chat", nick)
}

pub fn now_known_as(old: &str, new: &str) -> String {
    format!("{} is now known as {}", old, new)
}

/// Negative acknowledgement of a nick change.  The client recognizes the
/// `/nick ` prefix and reverts its local display name to the carried nick.
pub fn nick_revert(current: &str) -> String {
    format!("/nick {}", current)
}

pub fn chat(nick: &str, text: &str) -> String {
    format!("{}: {}", nick, text)
}

pub fn query(sender: &str, text: &str) -> String {
    format!("*{}* {}", sender, text)
}

pub fn query_echo(target: &str, text: &str) -> String {
    format!("-> *{}* {}", target, text)
}

pub fn channel_created(name: &str) -> String {
    format!("Channel {} created", name)
}

pub fn channel_exists(name: &str) -> String {
    format!("Channel {} already exists", name)
}

pub fn no_such_channel(name: &str) -> String {
    format!("Channel {} doesn't exist", name)
}

pub fn left_channel(nick: &str, channel: &str) -> String {
    format!("{} left {}", nick, channel)
}

pub fn joined_channel(nick: &str, channel: &str) -> String {
    format!("{} joined {}", nick, channel)
}

pub fn channel_list_entry(name: &str, users: usize) -> String {
    format!("*** {}\t{}", name, users)
}

pub fn channel_names(name: &str, nicks: &str) -> String {
    format!("{}: {}", name, nicks)
}

/// `/names` reports unknown channels with this wording, not the one `/join`
/// uses.
pub fn names_no_such_channel(name: &str) -> String {
    format!("{} channel doesn't exist", name)
}

pub fn all_users(nicks: &str) -> String {
    format!("all users: {}", nicks)
}

pub fn kicked_by(nick: &str) -> String {
    format!("Kicked by {}", nick)
}

pub fn has_been_kicked(nick: &str) -> String {
    format!("{} has been kicked", nick)
}

pub fn cannot_kick(nick: &str) -> String {
    format!("Can't kick nonexistent user {}", nick)
}
