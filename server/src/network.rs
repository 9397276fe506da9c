//! Server network layer handling UDP communications and intent dispatch

use crate::client_manager::ClientManager;
use crate::config::ServerConfig;
use crate::error::RoomError;
use crate::events::GameMessage;
use crate::room_manager::RoomManager;
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{Packet, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};
use tokio::time::interval;

/// Messages sent from network tasks to main server loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived { packet: Packet, addr: SocketAddr },
    ClientTimeout { client_id: u32 },
    Shutdown,
}

/// Main server coordinating networking and the room engine
pub struct Server {
    socket: Arc<UdpSocket>,
    clients: Arc<RwLock<ClientManager>>,
    rooms: Arc<RoomManager>,
    config: ServerConfig,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    game_rx: mpsc::UnboundedReceiver<GameMessage>,
}

impl Server {
    pub async fn new(config: ServerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let addr = config.bind_addr();
        let socket = Arc::new(UdpSocket::bind(&addr).await?);
        info!("Server listening on {}", socket.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (game_tx, game_rx) = mpsc::unbounded_channel();

        let rooms = Arc::new(RoomManager::new(game_tx.clone(), config.tick_duration()));

        Ok(Server {
            socket,
            clients: Arc::new(RwLock::new(ClientManager::new(config.max_clients))),
            rooms,
            config,
            server_tx,
            server_rx,
            game_tx,
            game_rx,
        })
    }

    /// Address the socket is actually bound to (useful with port 0)
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Handle for queueing messages into the main loop, e.g. `Shutdown`
    pub fn control(&self) -> mpsc::UnboundedSender<ServerMessage> {
        self.server_tx.clone()
    }

    pub fn rooms(&self) -> Arc<RoomManager> {
        Arc::clone(&self.rooms)
    }

    /// Spawns task that continuously listens for incoming packets
    fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; 2048];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                            if let Err(e) =
                                server_tx.send(ServerMessage::PacketReceived { packet, addr })
                            {
                                error!("Failed to send packet to main loop: {}", e);
                                break;
                            }
                        } else {
                            warn!("Failed to deserialize packet from {}", addr);
                        }
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns task that processes outgoing packet queue
    fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let clients = Arc::clone(&self.clients);
        let mut game_rx = std::mem::replace(&mut self.game_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = game_rx.recv().await {
                match message {
                    GameMessage::SendTo { packet, addr } => {
                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send packet to {}: {}", addr, e);
                        }
                    }
                    GameMessage::SendPacket { packet, client_id } => {
                        let addr = clients.read().await.addr_of(client_id);
                        match addr {
                            Some(addr) => {
                                if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await
                                {
                                    error!("Failed to send to client {}: {}", client_id, e);
                                }
                            }
                            None => debug!("Dropping packet for gone client {}", client_id),
                        }
                    }
                    GameMessage::Multicast { packet, client_ids } => {
                        let addrs: Vec<(u32, SocketAddr)> = {
                            let clients_guard = clients.read().await;
                            client_ids
                                .iter()
                                .filter_map(|id| clients_guard.addr_of(*id).map(|addr| (*id, addr)))
                                .collect()
                        };

                        let data = match serialize(&packet) {
                            Ok(data) => data,
                            Err(e) => {
                                error!("Failed to serialize packet: {}", e);
                                continue;
                            }
                        };

                        for (client_id, addr) in addrs {
                            if let Err(e) = socket.send_to(&data, addr).await {
                                error!("Failed to send to client {}: {}", client_id, e);
                            }
                        }
                    }
                }
            }
        });
    }

    /// Spawns task that monitors client timeouts
    fn spawn_timeout_checker(&self) {
        let clients = Arc::clone(&self.clients);
        let server_tx = self.server_tx.clone();
        let timeout = self.config.client_timeout;

        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(1));

            loop {
                interval.tick().await;

                let timed_out = {
                    let mut clients_guard = clients.write().await;
                    clients_guard.check_timeouts(timeout)
                };

                for client_id in timed_out {
                    if let Err(e) = server_tx.send(ServerMessage::ClientTimeout { client_id }) {
                        error!("Failed to send timeout message: {}", e);
                        return;
                    }
                }
            }
        });
    }

    async fn send_packet_impl(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    fn send_packet(&self, packet: Packet, addr: SocketAddr) {
        if let Err(e) = self.game_tx.send(GameMessage::SendTo { packet, addr }) {
            error!("Failed to queue packet for sending: {}", e);
        }
    }

    /// Takes a client out of its room, if it is in one
    async fn leave_room(&self, client_id: u32) {
        match self.rooms.leave(client_id).await {
            Ok(outcome) => debug!(
                "Client {} left room {} ({} remaining)",
                client_id, outcome.room_id, outcome.remaining
            ),
            Err(RoomError::UnknownClient(_)) => {}
            Err(e) => warn!("Leave for client {} failed: {}", client_id, e),
        }
    }

    async fn disconnect_client(&self, client_id: u32) {
        self.clients.write().await.remove_client(&client_id);
        self.leave_room(client_id).await;
    }

    /// Processes incoming packets and forwards intents to the room manager
    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        if let Packet::Connect { client_version } = packet {
            self.handle_connect(client_version, addr).await;
            return;
        }

        let client_id = {
            let mut clients = self.clients.write().await;
            let client_id = clients.find_client_by_addr(addr);
            if let Some(client_id) = client_id {
                clients.touch(client_id);
            }
            client_id
        };

        let Some(client_id) = client_id else {
            warn!("Packet from unknown address {}", addr);
            return;
        };

        match packet {
            Packet::Join {
                room_id,
                player_name,
            } => match self.rooms.join(client_id, &room_id, &player_name).await {
                Ok(outcome) => debug!(
                    "Client {} is player {} in room {} ({} players)",
                    client_id, outcome.player.name, outcome.room_id, outcome.population
                ),
                Err(e) => info!("Join for client {} rejected: {}", client_id, e),
            },

            Packet::Jump => {
                if let Err(e) = self.rooms.jump(client_id).await {
                    debug!("Ignoring jump from client {}: {}", client_id, e);
                }
            }

            Packet::Leave => self.leave_room(client_id).await,

            Packet::Heartbeat => {}

            Packet::Disconnect => self.disconnect_client(client_id).await,

            _ => {
                warn!("Unexpected packet type from client at {}", addr);
            }
        }
    }

    async fn handle_connect(&mut self, client_version: u32, addr: SocketAddr) {
        info!(
            "Client connecting from {} (version: {})",
            addr, client_version
        );

        if client_version != PROTOCOL_VERSION {
            self.send_packet(
                Packet::Disconnected {
                    reason: "Protocol version mismatch".to_string(),
                },
                addr,
            );
            return;
        }

        // Remove existing connection if present
        let existing_client_id = {
            let clients = self.clients.read().await;
            clients.find_client_by_addr(addr)
        };

        if let Some(existing_id) = existing_client_id {
            info!("Removing existing client {} from {}", existing_id, addr);
            self.disconnect_client(existing_id).await;
        }

        let client_id = {
            let mut clients = self.clients.write().await;
            clients.add_client(addr)
        };

        match client_id {
            Some(client_id) => self.send_packet(Packet::Connected { client_id }, addr),
            None => self.send_packet(
                Packet::Disconnected {
                    reason: "Server full".to_string(),
                },
                addr,
            ),
        }
    }

    /// Main server loop coordinating all operations
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // Initialize concurrent tasks
        self.spawn_network_receiver();
        self.spawn_network_sender();
        self.spawn_timeout_checker();

        let mut stats_interval = interval(Duration::from_secs(10));

        info!(
            "Server started successfully ({} Hz rooms, {} max clients)",
            self.config.tick_rate, self.config.max_clients
        );

        loop {
            tokio::select! {
                // Handle network events
                message = self.server_rx.recv() => {
                    match message {
                        Some(ServerMessage::PacketReceived { packet, addr }) => {
                            self.handle_packet(packet, addr).await;
                        },
                        Some(ServerMessage::ClientTimeout { client_id }) => {
                            self.leave_room(client_id).await;
                        },
                        Some(ServerMessage::Shutdown) | None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },

                // Periodic monitoring
                _ = stats_interval.tick() => {
                    let client_count = self.clients.read().await.len();
                    if client_count > 0 {
                        debug!("{} clients in {} rooms", client_count, self.rooms.room_count().await);
                    }
                },
            }
        }

        self.rooms.shutdown().await;
        Ok(())
    }
}
