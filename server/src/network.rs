//! Server network layer handling UDP communications and room loop coordination.

use crate::client_manager::ClientManager;
use crate::room::{Room, RoomConfig};
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{InputData, Packet, SessionId};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};
use tokio::time::interval;

/// Messages sent from network tasks to the main server loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived {
        packet: Packet,
        addr: SocketAddr,
    },
    ClientTimeout {
        session_id: SessionId,
    },
    #[allow(dead_code)]
    Shutdown,
}

/// Messages sent from the room loop to network tasks
#[derive(Debug)]
pub enum GameMessage {
    SendPacket {
        packet: Packet,
        addr: SocketAddr,
    },
    BroadcastPacket {
        packet: Packet,
        exclude: Option<SessionId>,
    },
}

/// Main server coordinating networking and the authoritative room simulation
pub struct Server {
    socket: Arc<UdpSocket>,
    clients: Arc<RwLock<ClientManager>>,
    room: Room,
    tick_duration: Duration,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    game_rx: mpsc::UnboundedReceiver<GameMessage>,
}

impl Server {
    pub async fn new(
        addr: &str,
        tick_duration: Duration,
        max_clients: usize,
        room_config: RoomConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("Server listening on {}", addr);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (game_tx, game_rx) = mpsc::unbounded_channel();

        Ok(Server {
            socket,
            clients: Arc::new(RwLock::new(ClientManager::new(max_clients))),
            room: Room::new(room_config),
            tick_duration,
            server_tx,
            server_rx,
            game_tx,
            game_rx,
        })
    }

    /// Spawns task that continuously listens for incoming packets
    async fn spawn_network_receiver(&self) {
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

    /// Spawns task that processes the outgoing packet queue
    async fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let clients = Arc::clone(&self.clients);
        let mut game_rx = std::mem::replace(&mut self.game_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = game_rx.recv().await {
                match message {
                    GameMessage::SendPacket { packet, addr } => {
                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send packet to {}: {}", addr, e);
                        }
                    }
                    GameMessage::BroadcastPacket { packet, exclude } => {
                        let client_addrs = {
                            let clients_guard = clients.read().await;
                            clients_guard.client_addrs()
                        };

                        for (session_id, addr) in client_addrs {
                            if Some(session_id) == exclude {
                                continue;
                            }

                            if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                                error!("Failed to send to client {}: {}", session_id, e);
                            }
                        }
                    }
                }
            }
        });
    }

    /// Spawns task that monitors client timeouts
    async fn spawn_timeout_checker(&self) {
        let clients = Arc::clone(&self.clients);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));

            loop {
                interval.tick().await;

                let timed_out = {
                    let mut clients_guard = clients.write().await;
                    clients_guard.check_timeouts()
                };

                for session_id in timed_out {
                    if let Err(e) = server_tx.send(ServerMessage::ClientTimeout { session_id }) {
                        error!("Failed to send timeout message: {}", e);
                        break;
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

    async fn send_packet(&self, packet: &Packet, addr: SocketAddr) {
        if let Err(e) = self.game_tx.send(GameMessage::SendPacket {
            packet: packet.clone(),
            addr,
        }) {
            error!("Failed to queue packet for sending: {}", e);
        }
    }

    async fn broadcast_packet(&self, packet: &Packet, exclude: Option<SessionId>) {
        if let Err(e) = self.game_tx.send(GameMessage::BroadcastPacket {
            packet: packet.clone(),
            exclude,
        }) {
            error!("Failed to queue broadcast packet: {}", e);
        }
    }

    /// Maps inbound packets onto room operations
    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        match packet {
            Packet::Connect {
                client_version,
                name,
            } => {
                info!(
                    "Client connecting from {} (version: {})",
                    addr, client_version
                );

                // A reconnect from a known address replaces the old session
                let existing_session = {
                    let clients = self.clients.read().await;
                    clients.find_by_addr(addr)
                };

                if let Some(existing_id) = existing_session {
                    info!("Removing existing session {} from {}", existing_id, addr);
                    let mut clients = self.clients.write().await;
                    clients.remove(&existing_id);
                    self.room.leave(existing_id);
                }

                let room_full = {
                    let clients = self.clients.read().await;
                    clients.is_full()
                };

                if room_full {
                    let response = Packet::Disconnected {
                        reason: "Server full".to_string(),
                    };
                    self.send_packet(&response, addr).await;
                    return;
                }

                let session_id = self.room.join(name);
                {
                    let mut clients = self.clients.write().await;
                    clients.register(session_id, addr);
                }

                let response = Packet::Connected {
                    session_id,
                    map_width: self.room.state().map_width,
                    map_height: self.room.state().map_height,
                };
                self.send_packet(&response, addr).await;
            }

            Packet::Input {
                left,
                right,
                up,
                down,
                eat_request,
                kill_request,
                tick,
            } => {
                let session_id = {
                    let clients = self.clients.read().await;
                    clients.find_by_addr(addr)
                };

                if let Some(session_id) = session_id {
                    {
                        let mut clients = self.clients.write().await;
                        clients.touch(session_id);
                    }

                    let input = InputData {
                        left,
                        right,
                        up,
                        down,
                        eat_request,
                        kill_request,
                        tick,
                    };
                    self.room.enqueue_input(session_id, input);
                } else {
                    debug!("Input from unregistered address {}", addr);
                }
            }

            Packet::Disconnect => {
                let session_id = {
                    let clients = self.clients.read().await;
                    clients.find_by_addr(addr)
                };

                if let Some(session_id) = session_id {
                    let mut clients = self.clients.write().await;
                    clients.remove(&session_id);
                    self.room.leave(session_id);
                }
            }

            _ => {
                warn!("Unexpected packet type from client at {}", addr);
            }
        }
    }

    /// Broadcasts the current world snapshot to all connected clients.
    /// A diffing layer would observe the same tree; full snapshots keep the
    /// transport simple while preserving the single-writer contract.
    async fn broadcast_game_state(&mut self) {
        let client_count = {
            let clients = self.clients.read().await;
            clients.len()
        };

        if client_count == 0 {
            return;
        }

        let state = self.room.state();
        let packet = Packet::GameState {
            map_width: state.map_width,
            map_height: state.map_height,
            players: state.players.clone(),
            food_items: state.food_items.clone(),
        };

        self.broadcast_packet(&packet, None).await;
    }

    /// Main server loop coordinating all operations
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.spawn_network_receiver().await;
        self.spawn_network_sender().await;
        self.spawn_timeout_checker().await;

        let mut tick_interval = interval(self.tick_duration);
        let mut last_tick = Instant::now();
        let mut driver_ticks: u64 = 0;

        info!("Server started successfully");

        loop {
            tokio::select! {
                // Handle network events
                message = self.server_rx.recv() => {
                    match message {
                        Some(ServerMessage::PacketReceived { packet, addr }) => {
                            self.handle_packet(packet, addr).await;
                        },
                        Some(ServerMessage::ClientTimeout { session_id }) => {
                            self.room.leave(session_id);
                        },
                        Some(ServerMessage::Shutdown) | None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },

                // Handle simulation tick events
                _ = tick_interval.tick() => {
                    let now = Instant::now();
                    let delta_ms = now.duration_since(last_tick).as_secs_f64() * 1000.0;
                    last_tick = now;

                    self.room.tick(delta_ms);
                    self.broadcast_game_state().await;

                    driver_ticks += 1;
                    if driver_ticks % 60 == 0 {
                        let client_count = {
                            let clients = self.clients.read().await;
                            clients.len()
                        };

                        if client_count > 0 {
                            debug!(
                                "Driver tick {}: {} clients, {} players, {} food",
                                driver_ticks,
                                client_count,
                                self.room.state().players.len(),
                                self.room.state().food_items.len()
                            );
                        }
                    }
                },
            }
        }

        Ok(())
    }
}
