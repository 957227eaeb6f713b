//! Headless driver for poking a running server: joins, steers for a few
//! seconds, and prints the snapshots it gets back.

use bincode::{deserialize, serialize};
use shared::{Packet, PROTOCOL_VERSION};
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::time::{sleep, Duration};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    println!("Client socket bound to {}", socket.local_addr()?);

    let server_addr = "127.0.0.1:8080".parse::<SocketAddr>()?;

    let connect_packet = Packet::Connect {
        client_version: PROTOCOL_VERSION,
        name: Some("probe".to_string()),
    };
    println!("Sending connect to {}", server_addr);
    socket.send_to(&serialize(&connect_packet)?, server_addr).await?;

    let mut buf = [0u8; 8192];
    let (len, _) = socket.recv_from(&mut buf).await?;

    let session_id = match deserialize::<Packet>(&buf[0..len])? {
        Packet::Connected {
            session_id,
            map_width,
            map_height,
        } => {
            println!(
                "Connected as session {} on a {}x{} map",
                session_id, map_width, map_height
            );
            session_id
        }
        Packet::Disconnected { reason } => {
            println!("Rejected: {}", reason);
            return Ok(());
        }
        other => {
            println!("Unexpected response: {:?}", other);
            return Ok(());
        }
    };

    // Cycle through the four headings, one intent per driver frame
    let headings = [
        (true, false, false, false),
        (false, false, true, false),
        (false, true, false, false),
        (false, false, false, true),
    ];

    for tick in 0u32..120 {
        let (left, right, up, down) = headings[(tick / 30) as usize % headings.len()];
        let input = Packet::Input {
            left,
            right,
            up,
            down,
            eat_request: None,
            kill_request: None,
            tick,
        };
        socket.send_to(&serialize(&input)?, server_addr).await?;

        if let Ok(Ok((len, _))) = tokio::time::timeout(
            Duration::from_millis(50),
            socket.recv_from(&mut buf),
        )
        .await
        {
            if let Ok(Packet::GameState {
                players,
                food_items,
                ..
            }) = deserialize::<Packet>(&buf[0..len])
            {
                if tick % 30 == 0 {
                    let me = players.get(&session_id);
                    println!(
                        "tick {}: {} players, {} food, me at {:?}",
                        tick,
                        players.len(),
                        food_items.len(),
                        me.map(|p| (p.x, p.y))
                    );
                }
            }
        }

        sleep(Duration::from_millis(16)).await;
    }

    socket.send_to(&serialize(&Packet::Disconnect)?, server_addr).await?;
    println!("Disconnected");
    Ok(())
}
