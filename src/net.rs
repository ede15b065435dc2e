//! The acceptor and the per-connection tasks.

use crate::client::MessageQueueItem;
use crate::config::Config;
use crate::state::State;
use palaver_reader::LineReader;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tokio::sync::mpsc;

/// Binds the listening socket described by the configuration.
pub fn bind(config: &Config) -> io::Result<TcpListener> {
    let addr = resolve(&config.host, config.port)?;
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(config.backlog)
}

fn resolve(host: &str, port: u16) -> io::Result<SocketAddr> {
    (host, port).to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("{}:{} does not resolve to an address", host, port),
        )
    })
}

/// Accepts connections forever, spawning one task per connection.
///
/// The acceptor itself never blocks on client I/O; a failed accept is logged
/// and the loop goes on.
pub async fn accept_loop(listener: TcpListener, state: State) -> io::Result<()> {
    log::info!("listening on {}", listener.local_addr()?);
    loop {
        match listener.accept().await {
            Ok((conn, peer)) => {
                log::debug!("accepted connection from {}", peer);
                tokio::spawn(handle(conn, state.clone()));
            }
            Err(err) => log::error!("failed to accept connection: {}", err),
        }
    }
}

/// Serves one connection until the peer goes away or the registry drops the
/// client.
///
/// The task interleaves two duties: draining the client's message queue onto
/// the socket, and feeding received lines to the state.  The queue closing
/// means the registry no longer knows this client (it was kicked); whatever
/// was queued before that has already been drained at that point.
async fn handle(conn: TcpStream, state: State) {
    let (read_half, mut write_half) = conn.into_split();
    let mut reader = LineReader::new(read_half);
    let (queue, mut outgoing) = mpsc::unbounded_channel::<MessageQueueItem>();
    let handle = state.peer_joined(queue).await;

    loop {
        tokio::select! {
            item = outgoing.recv() => match item {
                Some(msg) => {
                    let payload: &[u8] = msg.as_ref();
                    if let Err(err) = write_half.write_all(payload).await {
                        log::debug!("{}: write failed: {}", handle, err);
                        break;
                    }
                }
                None => break,
            },
            line = reader.read_line() => match line {
                Ok(Some(line)) => state.handle_message(handle, &line).await,
                Ok(None) => break,
                Err(err) => {
                    log::debug!("{}: read failed: {}", handle, err);
                    break;
                }
            },
        }
    }

    state.peer_quit(handle).await;
}
