//! Testing utilities for `palaver::state`

use crate::client::{Handle, MessageQueueItem};
use super::StateInner;
use tokio::sync::mpsc;

pub(crate) type Queue = mpsc::UnboundedReceiver<MessageQueueItem>;

pub(crate) fn simple_state() -> StateInner {
    StateInner::new()
}

/// Admits a client, handing back its handle and the receiving end of its
/// queue.
pub(crate) fn add_client(s: &mut StateInner) -> (Handle, Queue) {
    let (queue, outgoing) = mpsc::unbounded_channel();
    let handle = s.peer_joined(queue);
    (handle, outgoing)
}

/// Admits a client and renames it, discarding the admission noise from its
/// own queue.  Other queues still see the announcements.
pub(crate) fn add_named_client(s: &mut StateInner, nick: &str) -> (Handle, Queue) {
    let (handle, mut outgoing) = add_client(s);
    s.handle_message(handle, &format!("/nick {}", nick));
    flush(&mut outgoing);
    (handle, outgoing)
}

pub(crate) fn flush(queue: &mut Queue) {
    while queue.try_recv().is_ok() {}
}

pub(crate) fn collect(res: &mut String, queue: &mut Queue) {
    while let Ok(item) = queue.try_recv() {
        let s: &str = item.as_ref();
        res.push_str(s);
    }
}

/// Drains the queue into a list of lines.
pub(crate) fn lines(queue: &mut Queue) -> Vec<String> {
    let mut res = String::new();
    collect(&mut res, queue);
    res.lines().map(str::to_owned).collect()
}
