//! Channel data.

use crate::client::Handle;
use std::collections::HashSet;

/// A named broadcast group.
///
/// Membership is the only channel state; a channel outlives its last member
/// and is never reclaimed while the server runs.
#[derive(Default)]
pub struct Channel {
    /// Set of channel members, identified by their handle.
    pub members: HashSet<Handle>,
}

impl Channel {
    pub fn new() -> Channel {
        Channel::default()
    }

    /// Adds a member.
    pub fn add_member(&mut self, handle: Handle) {
        self.members.insert(handle);
    }

    /// Removes a member.
    pub fn remove_member(&mut self, handle: Handle) {
        self.members.remove(&handle);
    }
}
