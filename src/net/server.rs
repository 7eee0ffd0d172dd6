//! Maze-chase server: one thread per client, one mutex around all state.
use std::collections::{BTreeMap, HashMap};
use std::io::{BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use crate::error::Result;
use crate::net::arena::Arena;
use crate::net::protocol::{encode_frame, read_token, Direction, Snapshot};

pub struct ServerState {
    arena: Arena,
    players: BTreeMap<SocketAddr, (i32, i32)>,
    connections: HashMap<SocketAddr, TcpStream>,
    spawn_index: usize,
}

impl ServerState {
    pub fn new(arena: Arena) -> Self {
        Self { arena, players: BTreeMap::new(), connections: HashMap::new(), spawn_index: 0 }
    }

    /// Registers a player at the next corner. `stream` receives broadcasts.
    pub fn join(&mut self, addr: SocketAddr, stream: Option<TcpStream>) -> (i32, i32) {
        let pos = self.arena.spawn_point(self.spawn_index);
        self.spawn_index += 1;
        self.players.insert(addr, pos);
        if let Some(stream) = stream {
            self.connections.insert(addr, stream);
        }
        pos
    }

    /// Applies one move; returns the player's position afterwards.
    pub fn apply(&mut self, addr: SocketAddr, dir: Direction) -> Option<(i32, i32)> {
        let pos = self.players.get_mut(&addr)?;
        *pos = self.arena.step(*pos, dir);
        if self.arena.in_finish(*pos) {
            log::info!("{addr} reached the finish area");
        }
        Some(*pos)
    }

    pub fn leave(&mut self, addr: SocketAddr) {
        self.players.remove(&addr);
        self.connections.remove(&addr);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { players: self.players.clone() }
    }

    /// Sends the current snapshot to every connection. A failed send is
    /// logged; that client's own thread cleans it up.
    pub fn broadcast(&mut self) {
        let frame = match encode_frame(&self.snapshot()) {
            Ok(f) => f,
            Err(e) => {
                log::error!("snapshot encode failed: {e}");
                return;
            }
        };
        for (addr, conn) in self.connections.iter_mut() {
            if let Err(e) = conn.write_all(&frame) {
                log::warn!("send to {addr} failed: {e}");
            }
        }
    }
}

fn lock(state: &Mutex<ServerState>) -> MutexGuard<'_, ServerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn handle_client(state: Arc<Mutex<ServerState>>, stream: TcpStream, addr: SocketAddr) -> Result<()> {
    let writer = stream.try_clone()?;
    {
        let mut st = lock(&state);
        let pos = st.join(addr, Some(writer));
        log::info!("{addr} joined at {pos:?}");
        st.broadcast();
    }

    let mut reader = BufReader::new(stream);
    let outcome = loop {
        match read_token(&mut reader) {
            Ok(Some(dir)) => {
                let mut st = lock(&state);
                st.apply(addr, dir);
                st.broadcast();
            }
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };

    let mut st = lock(&state);
    st.leave(addr);
    st.broadcast();
    log::info!("{addr} left");
    outcome
}

/// Accepts clients forever.
pub fn serve(listener: TcpListener, arena: Arena) -> Result<()> {
    log::info!("listening on {}", listener.local_addr()?);
    let state = Arc::new(Mutex::new(ServerState::new(arena)));
    for conn in listener.incoming() {
        let stream = match conn {
            Ok(s) => s,
            Err(e) => {
                log::warn!("accept failed: {e}");
                continue;
            }
        };
        let addr = match stream.peer_addr() {
            Ok(a) => a,
            Err(e) => {
                log::warn!("peer address unavailable: {e}");
                continue;
            }
        };
        let _ = stream.set_nodelay(true);
        let state = Arc::clone(&state);
        thread::spawn(move || {
            if let Err(e) = handle_client(state, stream, addr) {
                log::warn!("{addr}: {e}");
            }
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn players_spawn_round_robin_on_corners() {
        let mut st = ServerState::new(Arena::new(800, 600));
        let spawns: Vec<_> = (0..5).map(|i| st.join(addr(1000 + i), None)).collect();
        assert_eq!(spawns[0], (20, 20));
        assert_eq!(spawns[1], (780, 20));
        assert_eq!(spawns[2], (20, 580));
        assert_eq!(spawns[3], (780, 580));
        assert_eq!(spawns[4], (20, 20));
        assert_eq!(st.snapshot().players.len(), 5);
    }

    #[test]
    fn moves_apply_and_unknown_players_are_ignored() {
        let mut st = ServerState::new(Arena::new(800, 600));
        st.join(addr(1), None);
        assert_eq!(st.apply(addr(1), Direction::Right), Some((25, 20)));
        assert_eq!(st.apply(addr(2), Direction::Right), None);
        st.leave(addr(1));
        assert!(st.snapshot().players.is_empty());
    }
}
