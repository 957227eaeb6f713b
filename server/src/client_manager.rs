//! Connection roster for the room's transport layer.
//!
//! Tracks which socket address speaks for which session, enforces the room
//! capacity, and sweeps out connections that have gone quiet. Intent
//! buffering is not handled here; that belongs to the room's per-player
//! input queues.

use log::info;
use shared::SessionId;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// One connected client: its session id, return address, and the last time
/// any packet arrived from it.
#[derive(Debug)]
pub struct Client {
    pub session_id: SessionId,
    pub addr: SocketAddr,
    pub last_seen: Instant,
}

impl Client {
    pub fn new(session_id: SessionId, addr: SocketAddr) -> Self {
        Self {
            session_id,
            addr,
            last_seen: Instant::now(),
        }
    }

    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

/// Keeps the authoritative set of live connections. Session ids are
/// allocated by the room; this roster only associates them with addresses.
pub struct ClientManager {
    clients: HashMap<SessionId, Client>,
    max_clients: usize,
}

impl ClientManager {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashMap::new(),
            max_clients,
        }
    }

    /// True when the room cannot take another connection.
    pub fn is_full(&self) -> bool {
        self.clients.len() >= self.max_clients
    }

    /// Associates a freshly joined session with its return address.
    pub fn register(&mut self, session_id: SessionId, addr: SocketAddr) {
        info!("Client {} connected from {}", session_id, addr);
        self.clients.insert(session_id, Client::new(session_id, addr));
    }

    /// Drops a connection. Returns true if it was present.
    pub fn remove(&mut self, session_id: &SessionId) -> bool {
        if let Some(client) = self.clients.remove(session_id) {
            info!("Client {} disconnected", client.session_id);
            true
        } else {
            false
        }
    }

    /// Resolves an incoming packet's source address to a session.
    pub fn find_by_addr(&self, addr: SocketAddr) -> Option<SessionId> {
        self.clients
            .iter()
            .find(|(_, client)| client.addr == addr)
            .map(|(session_id, _)| *session_id)
    }

    /// Marks a session as recently active.
    pub fn touch(&mut self, session_id: SessionId) {
        if let Some(client) = self.clients.get_mut(&session_id) {
            client.last_seen = Instant::now();
        }
    }

    /// Removes every connection that has been silent past the timeout and
    /// returns their session ids for room cleanup.
    pub fn check_timeouts(&mut self) -> Vec<SessionId> {
        let timed_out: Vec<SessionId> = self
            .clients
            .iter()
            .filter(|(_, client)| client.is_timed_out(CLIENT_TIMEOUT))
            .map(|(session_id, _)| *session_id)
            .collect();

        for session_id in &timed_out {
            self.remove(session_id);
        }

        timed_out
    }

    /// All connections as (session id, address) pairs, for broadcasting.
    pub fn client_addrs(&self) -> Vec<(SessionId, SocketAddr)> {
        self.clients
            .iter()
            .map(|(session_id, client)| (*session_id, client.addr))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
