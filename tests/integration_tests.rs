//! Integration tests for the arena server components
//!
//! These tests validate cross-component interactions, real network behavior,
//! and room simulation flows driven purely through the public API.

use bincode::{deserialize, serialize};
use server::room::{Room, RoomConfig};
use shared::{
    InputData, Packet, FIXED_TIMESTEP_MS, FOOD_CAPACITY, FOOD_SPAWN_INTERVAL_MS,
    INITIAL_TAIL_SIZE, MAP_HEIGHT, MAP_WIDTH, PROTOCOL_VERSION,
};
use std::net::UdpSocket;
use std::thread;
use std::time::Duration;
use tokio::time::sleep;

fn quiet_room() -> Room {
    Room::new(RoomConfig {
        spawn_bot: false,
        ..RoomConfig::default()
    })
}

/// NETWORK PROTOCOL TESTS
mod protocol_tests {
    use super::*;

    /// Tests packet serialization round-trip for network protocol validation
    #[tokio::test]
    async fn packet_serialization_roundtrip() {
        let test_packets = vec![
            Packet::Connect {
                client_version: PROTOCOL_VERSION,
                name: Some("probe".to_string()),
            },
            Packet::Input {
                left: true,
                right: false,
                up: false,
                down: false,
                eat_request: Some(3),
                kill_request: None,
                tick: 42,
            },
            Packet::Connected {
                session_id: 42,
                map_width: MAP_WIDTH,
                map_height: MAP_HEIGHT,
            },
            Packet::Disconnect,
            Packet::Disconnected {
                reason: "Test".to_string(),
            },
        ];

        for packet in test_packets {
            let serialized = serialize(&packet).unwrap();
            let deserialized: Packet = deserialize(&serialized).unwrap();

            match (&packet, &deserialized) {
                (Packet::Connect { .. }, Packet::Connect { .. }) => {}
                (Packet::Input { .. }, Packet::Input { .. }) => {}
                (Packet::Connected { .. }, Packet::Connected { .. }) => {}
                (Packet::Disconnect, Packet::Disconnect) => {}
                (Packet::Disconnected { .. }, Packet::Disconnected { .. }) => {}
                _ => panic!("Packet type mismatch after serialization"),
            }
        }
    }

    /// Tests real UDP socket communication
    #[tokio::test]
    async fn udp_socket_communication() {
        let server_socket = UdpSocket::bind("127.0.0.1:0").expect("Failed to bind server socket");
        let server_addr = server_socket.local_addr().unwrap();

        // Echo server
        let server_socket_clone = server_socket.try_clone().unwrap();
        thread::spawn(move || {
            let mut buf = [0; 1024];
            if let Ok((size, client_addr)) = server_socket_clone.recv_from(&mut buf) {
                let _ = server_socket_clone.send_to(&buf[..size], client_addr);
            }
        });

        sleep(Duration::from_millis(10)).await;

        let client_socket = UdpSocket::bind("127.0.0.1:0").expect("Failed to bind client socket");
        client_socket
            .set_read_timeout(Some(Duration::from_millis(100)))
            .unwrap();

        let test_packet = Packet::Connect {
            client_version: PROTOCOL_VERSION,
            name: None,
        };
        let serialized = serialize(&test_packet).unwrap();

        client_socket.send_to(&serialized, server_addr).unwrap();

        let mut buf = [0; 1024];
        let (size, _) = client_socket.recv_from(&mut buf).unwrap();
        let received_packet: Packet = deserialize(&buf[..size]).unwrap();

        match received_packet {
            Packet::Connect { client_version, .. } => {
                assert_eq!(client_version, PROTOCOL_VERSION)
            }
            _ => panic!("Wrong packet type received"),
        }
    }
}

/// ROOM SIMULATION FLOW TESTS
mod room_flow_tests {
    use super::*;

    /// A join allocates a fully initialized player; a leave removes it
    #[test]
    fn join_and_leave_lifecycle() {
        let mut room = quiet_room();

        let first = room.join(None);
        let second = room.join(Some("probe".to_string()));
        assert_eq!(room.state().players.len(), 2);

        let player = room.state().players.get(&second).unwrap();
        assert_eq!(player.name, "probe");
        assert!(player.alive);
        assert_eq!(player.tail_size, INITIAL_TAIL_SIZE);

        room.leave(first);
        assert_eq!(room.state().players.len(), 1);
        assert!(!room.state().players.contains_key(&first));
    }

    /// The bot occupant appears only on the transition from empty
    #[test]
    fn bot_joins_first_occupant() {
        let mut room = Room::new(RoomConfig::default());

        room.join(None);
        assert_eq!(room.state().players.len(), 2);

        room.join(None);
        assert_eq!(room.state().players.len(), 3);
    }

    /// Enqueued intents take effect only at the next tick boundary
    #[test]
    fn inputs_are_deferred_to_tick() {
        let mut room = quiet_room();
        let id = room.join(None);

        let before = {
            let p = room.state().players.get(&id).unwrap();
            (p.x, p.x_request, p.y_request)
        };

        room.enqueue_input(id, InputData::direction(false, true, false, false));
        let unchanged = {
            let p = room.state().players.get(&id).unwrap();
            (p.x, p.x_request, p.y_request)
        };
        assert_eq!(before, unchanged);

        room.fixed_tick(FIXED_TIMESTEP_MS);
        let p = room.state().players.get(&id).unwrap();
        assert_eq!((p.x_request, p.y_request), (1, 0));
        assert_eq!(p.x, before.0 + 2.0);
    }

    /// Movement advances one velocity step per fixed step, never diagonally
    #[test]
    fn movement_is_axis_aligned() {
        let mut room = quiet_room();
        let id = room.join(None);

        room.enqueue_input(id, InputData::direction(false, false, true, false));
        let start = {
            let p = room.state().players.get(&id).unwrap();
            (p.x, p.y)
        };
        for _ in 0..10 {
            room.fixed_tick(FIXED_TIMESTEP_MS);
        }

        let p = room.state().players.get(&id).unwrap();
        assert_eq!(p.x, start.0);
        assert_eq!(p.y, start.1 - 20.0);
    }

    /// Identical empty-queue steps produce identical deltas
    #[test]
    fn simulation_is_deterministic_without_inputs() {
        let mut room = quiet_room();
        let id = room.join(None);

        let p0 = {
            let p = room.state().players.get(&id).unwrap();
            (p.x, p.y)
        };
        room.fixed_tick(FIXED_TIMESTEP_MS);
        let p1 = {
            let p = room.state().players.get(&id).unwrap();
            (p.x, p.y)
        };
        room.fixed_tick(FIXED_TIMESTEP_MS);
        let p2 = {
            let p = room.state().players.get(&id).unwrap();
            (p.x, p.y)
        };

        assert_eq!((p1.0 - p0.0, p1.1 - p0.1), (p2.0 - p1.0, p2.1 - p1.1));
    }

    /// The periodic spawner fills the room to capacity and no further
    #[test]
    fn food_reaches_capacity_and_stops() {
        let mut room = quiet_room();
        room.join(None);

        // enough simulated time for far more spawns than the cap allows
        room.tick(FOOD_SPAWN_INTERVAL_MS * (FOOD_CAPACITY as f64 + 5.0));
        assert_eq!(room.state().food_items.len(), FOOD_CAPACITY);

        room.tick(FOOD_SPAWN_INTERVAL_MS * 3.0);
        assert_eq!(room.state().food_items.len(), FOOD_CAPACITY);
    }

    /// Wall-clock deltas smaller than a fixed step accumulate instead of
    /// being lost
    #[test]
    fn partial_steps_accumulate() {
        let mut room = quiet_room();
        let id = room.join(None);
        let start_x = room.state().players.get(&id).unwrap().x;

        room.tick(FIXED_TIMESTEP_MS * 0.75);
        assert_eq!(room.state().players.get(&id).unwrap().x, start_x);

        room.tick(FIXED_TIMESTEP_MS * 0.75);
        // exactly one fixed step worth of movement (initial heading is left)
        assert_eq!(room.state().players.get(&id).unwrap().x, start_x - 2.0);
    }
}
