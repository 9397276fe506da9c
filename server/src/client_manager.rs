//! Client connection management for the multiplayer server
//!
//! This module handles the server-side bookkeeping of connected clients, including:
//! - Client connection lifecycle (connect, disconnect, timeout)
//! - Mapping between network addresses and server-assigned client IDs
//! - Connection health monitoring and automatic cleanup
//! - Process-wide connection capacity
//!
//! Which room a client plays in is not tracked here; that belongs to the room manager.

use log::info;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Represents a connected client
#[derive(Debug)]
pub struct Client {
    /// Unique client identifier assigned by the server
    pub id: u32,
    /// Network address for sending responses
    pub addr: SocketAddr,
    /// Last time we received any packet from this client
    pub last_seen: Instant,
}

impl Client {
    /// Creates a new client with the given ID and network address
    pub fn new(id: u32, addr: SocketAddr) -> Self {
        Self {
            id,
            addr,
            last_seen: Instant::now(),
        }
    }

    /// Records activity from this client
    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Checks if the client has exceeded the connection timeout
    ///
    /// Returns true if no packets have been received from this client
    /// within the specified timeout duration, indicating a likely disconnect.
    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

/// Manages all connected clients
///
/// The ClientManager hands out client IDs, enforces the server-wide
/// connection limit and detects clients that went silent. Client IDs
/// are never reused while the process runs.
pub struct ClientManager {
    /// Connected clients indexed by their unique ID
    clients: HashMap<u32, Client>,
    /// Next available client ID for new connections
    next_client_id: u32,
    /// Maximum number of concurrent clients allowed
    max_clients: usize,
}

impl ClientManager {
    /// Creates a new client manager with the specified capacity limit
    ///
    /// Client IDs start from 1 and increment for each new connection.
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashMap::new(),
            next_client_id: 1,
            max_clients,
        }
    }

    /// Attempts to add a new client connection
    ///
    /// Returns Some(client_id) if successful, None if server is at capacity.
    pub fn add_client(&mut self, addr: SocketAddr) -> Option<u32> {
        if self.clients.len() >= self.max_clients {
            return None;
        }

        let client_id = self.next_client_id;
        self.next_client_id += 1;

        let client = Client::new(client_id, addr);
        info!("Client {} connected from {}", client_id, addr);
        self.clients.insert(client_id, client);

        Some(client_id)
    }

    /// Removes a client from the server
    ///
    /// Returns true if the client was found and removed, false if they were already gone.
    pub fn remove_client(&mut self, client_id: &u32) -> bool {
        if let Some(client) = self.clients.remove(client_id) {
            info!("Client {} disconnected", client.id);
            true
        } else {
            false
        }
    }

    /// Finds a client ID by their network address
    ///
    /// Used to associate incoming packets with existing client connections.
    pub fn find_client_by_addr(&self, addr: SocketAddr) -> Option<u32> {
        self.clients
            .iter()
            .find(|(_, client)| client.addr == addr)
            .map(|(id, _)| *id)
    }

    /// Gets the network address of a client
    pub fn addr_of(&self, client_id: u32) -> Option<SocketAddr> {
        self.clients.get(&client_id).map(|client| client.addr)
    }

    /// Marks a client as recently active. Returns false if the client ID is invalid.
    pub fn touch(&mut self, client_id: u32) -> bool {
        if let Some(client) = self.clients.get_mut(&client_id) {
            client.touch();
            true
        } else {
            false
        }
    }

    /// Checks for and removes timed-out clients
    ///
    /// Returns the removed client IDs so their birds can be taken out of their rooms.
    pub fn check_timeouts(&mut self, timeout: Duration) -> Vec<u32> {
        let timed_out: Vec<u32> = self
            .clients
            .iter()
            .filter(|(_, client)| client.is_timed_out(timeout))
            .map(|(id, _)| *id)
            .collect();

        for client_id in &timed_out {
            info!("Client {} timed out", client_id);
            self.remove_client(client_id);
        }

        timed_out
    }

    /// Returns the number of currently connected clients
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns true if no clients are currently connected
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_addr() -> SocketAddr {
        "127.0.0.1:8080".parse().unwrap()
    }

    fn test_addr2() -> SocketAddr {
        "127.0.0.1:8081".parse().unwrap()
    }

    #[test]
    fn test_client_creation() {
        let addr = test_addr();
        let client = Client::new(1, addr);

        assert_eq!(client.id, 1);
        assert_eq!(client.addr, addr);
        assert!(!client.is_timed_out(Duration::from_secs(1)));
    }

    #[test]
    fn test_client_timeout() {
        let mut client = Client::new(1, test_addr());

        std::thread::sleep(Duration::from_millis(20));
        assert!(client.is_timed_out(Duration::from_millis(10)));

        client.touch();
        assert!(!client.is_timed_out(Duration::from_secs(1)));
    }

    #[test]
    fn test_client_manager_creation() {
        let manager = ClientManager::new(5);
        assert_eq!(manager.max_clients, 5);
        assert!(manager.is_empty());
        assert_eq!(manager.len(), 0);
    }

    #[test]
    fn test_add_multiple_clients() {
        let mut manager = ClientManager::new(3);

        let client_id1 = manager.add_client(test_addr()).unwrap();
        let client_id2 = manager.add_client(test_addr2()).unwrap();

        assert_eq!(client_id1, 1);
        assert_eq!(client_id2, 2);
        assert_eq!(manager.len(), 2);
        assert_eq!(manager.addr_of(client_id2), Some(test_addr2()));
    }

    #[test]
    fn test_add_client_max_capacity() {
        let mut manager = ClientManager::new(1);

        assert!(manager.add_client(test_addr()).is_some());
        assert!(manager.add_client(test_addr2()).is_none());
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut manager = ClientManager::new(2);

        let first = manager.add_client(test_addr()).unwrap();
        manager.remove_client(&first);
        let second = manager.add_client(test_addr()).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_remove_client() {
        let mut manager = ClientManager::new(2);

        let client_id = manager.add_client(test_addr()).unwrap();
        assert!(manager.remove_client(&client_id));
        assert!(!manager.remove_client(&client_id));
        assert!(manager.is_empty());
        assert_eq!(manager.addr_of(client_id), None);
    }

    #[test]
    fn test_find_client_by_addr() {
        let mut manager = ClientManager::new(2);

        let client_id1 = manager.add_client(test_addr()).unwrap();
        let _client_id2 = manager.add_client(test_addr2()).unwrap();

        assert_eq!(manager.find_client_by_addr(test_addr()), Some(client_id1));

        let unknown_addr: SocketAddr = "192.168.1.1:9999".parse().unwrap();
        assert_eq!(manager.find_client_by_addr(unknown_addr), None);
    }

    #[test]
    fn test_touch_unknown_client() {
        let mut manager = ClientManager::new(2);
        assert!(!manager.touch(7));

        let client_id = manager.add_client(test_addr()).unwrap();
        assert!(manager.touch(client_id));
    }

    #[test]
    fn test_check_timeouts() {
        let mut manager = ClientManager::new(2);

        let stale = manager.add_client(test_addr()).unwrap();
        let fresh = manager.add_client(test_addr2()).unwrap();
        std::thread::sleep(Duration::from_millis(300));
        manager.touch(fresh);

        let removed = manager.check_timeouts(Duration::from_millis(150));

        assert_eq!(removed, vec![stale]);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.addr_of(fresh), Some(test_addr2()));
    }
}
