//! Handlers for the slash commands and channel chat.

use crate::client::{ClientStatus, Handle};
use crate::lines;
use super::{HandlerResult as Result, StateInner};

impl StateInner {
    /// Routes one received line.
    ///
    /// Blank input is dropped, a `/`-prefixed line is tokenized and handed
    /// to the matching command handler, anything else is chat in the
    /// client's current channel.  Input from a client that is no longer
    /// active is ignored; its record is on the way out.
    pub fn handle_message(&mut self, handle: Handle, line: &str) {
        let client = match self.clients.get(&handle) {
            Some(client) => client,
            None => return,
        };
        if client.status() != ClientStatus::Active {
            return;
        }
        if line.trim().is_empty() {
            return;
        }

        if !line.starts_with('/') {
            let target = client.channel().to_owned();
            log::debug!("{}: chat on {}: {:?}", handle, target, line);
            self.broadcast(&target, lines::chat(client.nick(), line).into());
            return;
        }

        let mut words = line.split_whitespace();
        let command = &words.next().unwrap()[1..];
        let args: Vec<&str> = words.collect();
        log::debug!("{}: /{} {:?}", handle, command, args);
        let result = match command {
            "nick" => self.cmd_nick(handle, args.first().copied()),
            "msg" => self.cmd_msg(handle, &args),
            "mkch" => self.cmd_mkch(handle, args.first().copied()),
            "join" => self.cmd_join(handle, args.first().copied()),
            "list" => self.cmd_list(handle),
            "names" => self.cmd_names(handle, &args),
            "kick" => self.cmd_kick(handle, args.first().copied()),
            _ => {
                self.send(handle, lines::INVALID_COMMAND.into());
                Err(())
            }
        };
        if result.is_err() {
            log::debug!("{}: /{} rejected", handle, command);
        }
    }

    /// Changes the sender's nickname and announces the change to everyone.
    ///
    /// A refused change (and a missing argument) is answered with the
    /// `/nick <current>` negative ack, so the client can put its local
    /// display name back.
    fn cmd_nick(&mut self, handle: Handle, nick: Option<&str>) -> Result {
        let new_nick = match nick {
            Some(nick) => nick,
            None => return self.reject_nick(handle),
        };
        match self.rename(handle, new_nick) {
            Ok(old) => {
                if old != new_nick {
                    self.broadcast_all(lines::now_known_as(&old, new_nick).into());
                }
                Ok(())
            }
            Err(()) => self.reject_nick(handle),
        }
    }

    fn reject_nick(&mut self, handle: Handle) -> Result {
        let current = self.clients[&handle].nick().to_owned();
        self.send(handle, lines::nick_revert(&current).into());
        Err(())
    }

    /// Delivers a direct message to the addressed peer, echoing it back to
    /// the sender.  An unknown target drops the message without a reply, as
    /// does a message with nothing to say.
    fn cmd_msg(&mut self, handle: Handle, args: &[&str]) -> Result {
        let (target, text) = match args.split_first() {
            Some((target, text)) if !text.is_empty() => (*target, text.join(" ")),
            _ => return Err(()),
        };
        let peer = match self.nicks.get(target) {
            Some(&peer) => peer,
            None => return Err(()),
        };
        let sender = self.clients[&handle].nick().to_owned();
        self.send(peer, lines::query(&sender, &text).into());
        self.send(handle, lines::query_echo(target, &text).into());
        Ok(())
    }

    /// Creates a channel.  Creation is announced to everyone; a duplicate
    /// name is reported to the sender only.
    fn cmd_mkch(&mut self, handle: Handle, name: Option<&str>) -> Result {
        let name = match name {
            Some(name) => name,
            None => return self.reject(handle),
        };
        if !self.create_channel(name) {
            self.send(handle, lines::channel_exists(name).into());
            return Err(());
        }
        self.broadcast_all(lines::channel_created(name).into());
        Ok(())
    }

    /// Moves the sender to an existing channel, announcing the departure to
    /// the channel it leaves and the arrival to the one it enters.
    fn cmd_join(&mut self, handle: Handle, name: Option<&str>) -> Result {
        let name = match name {
            Some(name) => name,
            None => return self.reject(handle),
        };
        let old = match self.move_to_channel(handle, name) {
            Ok(old) => old,
            Err(()) => {
                self.send(handle, lines::no_such_channel(name).into());
                return Err(());
            }
        };
        let nick = self.clients[&handle].nick().to_owned();
        self.broadcast(&old, lines::left_channel(&nick, &old).into());
        self.broadcast(name, lines::joined_channel(&nick, name).into());
        Ok(())
    }

    /// Sends the sender the channel table, one line per channel.
    fn cmd_list(&mut self, handle: Handle) -> Result {
        self.send(handle, lines::CHANNEL_LIST_HEADER.into());
        for (name, users) in self.channel_overview() {
            self.send(handle, lines::channel_list_entry(&name, users).into());
        }
        Ok(())
    }

    /// Sends the sender the members of the named channels, or the nicks of
    /// everyone connected when no channel is named.
    fn cmd_names(&mut self, handle: Handle, channels: &[&str]) -> Result {
        if channels.is_empty() {
            let nicks = self.all_nicks().join(" ");
            self.send(handle, lines::all_users(&nicks).into());
            return Ok(());
        }
        for &name in channels {
            match self.channel_nicks(name) {
                Some(nicks) => {
                    self.send(handle, lines::channel_names(name, &nicks.join(" ")).into())
                }
                None => self.send(handle, lines::names_no_such_channel(name).into()),
            }
        }
        Ok(())
    }

    /// Throws the named client off the server.  Anyone may kick anyone,
    /// including themselves.
    fn cmd_kick(&mut self, handle: Handle, nick: Option<&str>) -> Result {
        let nick = match nick {
            Some(nick) => nick,
            None => return self.reject(handle),
        };
        let target = match self.nicks.get(nick) {
            Some(&target) => target,
            None => {
                self.send(handle, lines::cannot_kick(nick).into());
                return Err(());
            }
        };
        let sender = self.clients[&handle].nick().to_owned();
        self.clients.get_mut(&target).unwrap().set_status(ClientStatus::Inactive);
        self.send(target, lines::kicked_by(&sender).into());
        self.send(handle, lines::has_been_kicked(nick).into());
        self.remove(target);
        Ok(())
    }

    fn reject(&mut self, handle: Handle) -> Result {
        self.send(handle, lines::INVALID_COMMAND.into());
        Err(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test::{add_client, add_named_client, flush, lines, simple_state};
    use crate::client::ClientStatus;

    #[test]
    fn solo_chat() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_client(&mut s);
        assert_eq!(lines(&mut queue_a), ["0 joined chat"]);
        s.handle_message(a, "hello");
        assert_eq!(lines(&mut queue_a), ["0: hello"]);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_client(&mut s);
        flush(&mut queue_a);
        s.handle_message(a, "");
        s.handle_message(a, "   ");
        assert!(lines(&mut queue_a).is_empty());
    }

    #[test]
    fn unknown_command() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_client(&mut s);
        flush(&mut queue_a);
        s.handle_message(a, "/frobnicate now");
        assert_eq!(lines(&mut queue_a), ["invalid command"]);
        s.handle_message(a, "/ nick x");
        assert_eq!(lines(&mut queue_a), ["invalid command"]);
    }

    #[test]
    fn rename_is_broadcast() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_client(&mut s);
        let (b, mut queue_b) = add_client(&mut s);
        flush(&mut queue_a);
        flush(&mut queue_b);

        s.handle_message(a, "/nick alice");
        assert_eq!(lines(&mut queue_a), ["0 is now known as alice"]);
        assert_eq!(lines(&mut queue_b), ["0 is now known as alice"]);

        // the loser of the race is told privately; nobody else hears of it
        s.handle_message(b, "/nick alice");
        assert_eq!(lines(&mut queue_b), ["/nick 1"]);
        assert!(lines(&mut queue_a).is_empty());
    }

    #[test]
    fn rename_to_own_nick_is_not_announced() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_named_client(&mut s, "alice");
        s.handle_message(a, "/nick alice");
        assert!(lines(&mut queue_a).is_empty());
    }

    #[test]
    fn rename_without_argument_is_refused() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_named_client(&mut s, "alice");
        s.handle_message(a, "/nick");
        assert_eq!(lines(&mut queue_a), ["/nick alice"]);
    }

    #[test]
    fn channel_split() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_named_client(&mut s, "alice");
        let (_b, mut queue_b) = add_client(&mut s);
        flush(&mut queue_a);
        flush(&mut queue_b);

        s.handle_message(a, "/mkch lounge");
        assert_eq!(lines(&mut queue_a), ["Channel lounge created"]);
        assert_eq!(lines(&mut queue_b), ["Channel lounge created"]);

        s.handle_message(a, "/join lounge");
        assert_eq!(lines(&mut queue_a), ["alice joined lounge"]);
        assert_eq!(lines(&mut queue_b), ["alice left default"]);

        s.handle_message(a, "hi");
        assert_eq!(lines(&mut queue_a), ["alice: hi"]);
        assert!(lines(&mut queue_b).is_empty());
    }

    #[test]
    fn duplicate_channel_is_reported_to_sender_only() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_client(&mut s);
        let (_b, mut queue_b) = add_client(&mut s);
        s.handle_message(a, "/mkch lounge");
        flush(&mut queue_a);
        flush(&mut queue_b);
        s.handle_message(a, "/mkch lounge");
        assert_eq!(lines(&mut queue_a), ["Channel lounge already exists"]);
        assert!(lines(&mut queue_b).is_empty());
    }

    #[test]
    fn join_missing_channel() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_client(&mut s);
        flush(&mut queue_a);
        s.handle_message(a, "/join lounge");
        assert_eq!(lines(&mut queue_a), ["Channel lounge doesn't exist"]);
    }

    #[test]
    fn direct_message() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_named_client(&mut s, "alice");
        let (_b, mut queue_b) = add_named_client(&mut s, "bob");
        flush(&mut queue_a);

        s.handle_message(a, "/msg bob hello there");
        assert_eq!(lines(&mut queue_b), ["*alice* hello there"]);
        assert_eq!(lines(&mut queue_a), ["-> *bob* hello there"]);
    }

    #[test]
    fn direct_message_to_unknown_nick_is_dropped() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_named_client(&mut s, "alice");
        s.handle_message(a, "/msg ghost hello");
        s.handle_message(a, "/msg");
        s.handle_message(a, "/msg bob");
        assert!(lines(&mut queue_a).is_empty());
    }

    #[test]
    fn listing() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_named_client(&mut s, "alice");
        let (_b, _queue_b) = add_named_client(&mut s, "bob");
        let (_c, _queue_c) = add_client(&mut s);
        s.handle_message(a, "/mkch lounge");
        s.handle_message(a, "/join lounge");
        flush(&mut queue_a);

        s.handle_message(a, "/list");
        assert_eq!(
            lines(&mut queue_a),
            ["*** Channel\tUsers", "*** default\t2", "*** lounge\t1"]
        );

        s.handle_message(a, "/names lounge");
        assert_eq!(lines(&mut queue_a), ["lounge: alice"]);

        s.handle_message(a, "/names default void");
        assert_eq!(lines(&mut queue_a), ["default: 2 bob", "void channel doesn't exist"]);

        s.handle_message(a, "/names");
        assert_eq!(lines(&mut queue_a), ["all users: 2 alice bob"]);
    }

    #[test]
    fn kick() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_named_client(&mut s, "alice");
        let (b, mut queue_b) = add_named_client(&mut s, "bob");
        flush(&mut queue_a);

        s.handle_message(a, "/kick bob");
        assert_eq!(lines(&mut queue_a), ["bob has been kicked", "bob left chat"]);
        assert_eq!(lines(&mut queue_b), ["Kicked by alice"]);
        assert!(!s.clients.contains_key(&b));
        assert!(!s.nicks.contains_key("bob"));

        s.handle_message(a, "/kick bob");
        assert_eq!(lines(&mut queue_a), ["Can't kick nonexistent user bob"]);
    }

    #[test]
    fn input_from_an_inactive_client_is_ignored() {
        let mut s = simple_state();
        let (a, mut queue_a) = add_client(&mut s);
        let (b, mut queue_b) = add_client(&mut s);
        flush(&mut queue_a);
        flush(&mut queue_b);
        s.clients.get_mut(&b).unwrap().set_status(ClientStatus::Inactive);
        s.handle_message(b, "hello");
        assert!(lines(&mut queue_a).is_empty());
        assert!(lines(&mut queue_b).is_empty());
        s.handle_message(a, "hello");
        assert_eq!(lines(&mut queue_a), ["0: hello"]);
    }
}
