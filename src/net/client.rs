//! Maze-chase client: sends tokens, a reader thread forwards snapshots.
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::error::Result;
use crate::net::protocol::{read_frame, write_token, Direction, Snapshot};

enum NetworkEvent {
    Snapshot(Snapshot),
    Closed,
    Error(String),
}

pub struct Client {
    writer: TcpStream,
    local: SocketAddr,
    events: Receiver<NetworkEvent>,
    latest: Snapshot,
    connected: bool,
}

impl Client {
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        let _ = stream.set_nodelay(true);
        let local = stream.local_addr()?;
        let mut reader = stream.try_clone()?;
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let event = match read_frame(&mut reader) {
                    Ok(Some(s)) => NetworkEvent::Snapshot(s),
                    Ok(None) => NetworkEvent::Closed,
                    Err(e) => NetworkEvent::Error(e.to_string()),
                };
                let done = !matches!(event, NetworkEvent::Snapshot(_));
                if tx.send(event).is_err() || done {
                    break;
                }
            }
        });
        log::info!("connected as {local}");
        Ok(Self { writer: stream, local, events: rx, latest: Snapshot::default(), connected: true })
    }

    /// Our address as the server sees it, barring NAT.
    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn send(&mut self, dir: Direction) -> Result<()> {
        write_token(&mut self.writer, dir)
    }

    /// Drains pending snapshots without blocking.
    pub fn poll(&mut self) -> &Snapshot {
        loop {
            match self.events.try_recv() {
                Ok(ev) => self.handle(ev),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.connected = false;
                    break;
                }
            }
        }
        &self.latest
    }

    /// Blocks up to `timeout` for the next snapshot.
    pub fn wait_for_update(&mut self, timeout: Duration) -> Option<&Snapshot> {
        match self.events.recv_timeout(timeout) {
            Ok(NetworkEvent::Snapshot(s)) => {
                self.latest = s;
                Some(&self.latest)
            }
            Ok(ev) => {
                self.handle(ev);
                None
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.connected = false;
                None
            }
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.latest
    }

    /// Our own position in the latest snapshot.
    pub fn position(&self) -> Option<(i32, i32)> {
        self.latest.players.get(&self.local).copied()
    }

    fn handle(&mut self, ev: NetworkEvent) {
        match ev {
            NetworkEvent::Snapshot(s) => self.latest = s,
            NetworkEvent::Closed => {
                log::info!("server closed the connection");
                self.connected = false;
            }
            NetworkEvent::Error(e) => {
                log::warn!("connection lost: {e}");
                self.connected = false;
            }
        }
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        // the reader thread holds a clone; shutting down ends it and tells the server
        let _ = self.writer.shutdown(Shutdown::Both);
    }
}
