//! Headless bot that connects to a server, joins a room and keeps its bird
//! near the middle of the next gap until the game ends.

use bincode::{deserialize, serialize};
use clap::Parser;
use server::utils::get_timestamp;
use shared::{
    ObstacleSnapshot, Packet, PlayerSnapshot, BIRD_SIZE, GAP_HEIGHT, MAX_PACKET_SIZE,
    PLAYER_START_Y, PROTOCOL_VERSION,
};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::time::timeout;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server address
    #[clap(short, long, default_value = "127.0.0.1:8080")]
    server: SocketAddr,
    /// Room to join
    #[clap(short, long, default_value = "lobby")]
    room: String,
    /// Display name
    #[clap(short, long, default_value = "bot")]
    name: String,
}

// Height the bird should hover around: the middle of the closest gap ahead,
// or the starting height when no obstacle is ahead
fn target_y(bird: &PlayerSnapshot, obstacles: &[ObstacleSnapshot]) -> f32 {
    obstacles
        .iter()
        .filter(|o| o.x + shared::OBSTACLE_WIDTH > bird.x)
        .min_by(|a, b| a.x.total_cmp(&b.x))
        .map(|o| o.gap_top + GAP_HEIGHT / 2.0)
        .unwrap_or(PLAYER_START_Y)
}

fn should_jump(bird: &PlayerSnapshot, obstacles: &[ObstacleSnapshot]) -> bool {
    bird.alive && bird.velocity >= 0.0 && bird.y + BIRD_SIZE / 2.0 > target_y(bird, obstacles)
}

async fn send(
    socket: &UdpSocket,
    packet: &Packet,
    server: SocketAddr,
) -> Result<(), Box<dyn std::error::Error>> {
    socket.send_to(&serialize(packet)?, server).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    println!("Client socket bound to {}", socket.local_addr()?);

    println!("Sending connection request to {}", args.server);
    send(
        &socket,
        &Packet::Connect {
            client_version: PROTOCOL_VERSION,
        },
        args.server,
    )
    .await?;

    let mut buf = [0u8; MAX_PACKET_SIZE];
    let (len, _) = timeout(Duration::from_secs(5), socket.recv_from(&mut buf)).await??;
    let client_id = match deserialize::<Packet>(&buf[..len])? {
        Packet::Connected { client_id } => client_id,
        other => {
            println!("Expected Connected but got: {:?}", other);
            return Ok(());
        }
    };
    println!("Connection accepted with client ID: {}", client_id);

    send(
        &socket,
        &Packet::Join {
            room_id: args.room.clone(),
            player_name: args.name.clone(),
        },
        args.server,
    )
    .await?;

    let started_at = get_timestamp();
    let mut last_heartbeat = Instant::now();
    let mut score = 0;

    loop {
        if last_heartbeat.elapsed() >= Duration::from_secs(1) {
            send(&socket, &Packet::Heartbeat, args.server).await?;
            last_heartbeat = Instant::now();
        }

        let len = match timeout(Duration::from_millis(500), socket.recv_from(&mut buf)).await {
            Ok(Ok((len, _))) => len,
            Ok(Err(e)) => {
                println!("Error receiving packet: {}", e);
                continue;
            }
            Err(_) => continue,
        };

        match deserialize::<Packet>(&buf[..len]) {
            Ok(Packet::GameState {
                players, obstacles, ..
            }) => {
                if let Some(bird) = players.iter().find(|p| p.id == client_id) {
                    if should_jump(bird, &obstacles) {
                        send(&socket, &Packet::Jump, args.server).await?;
                    }
                }
            }
            Ok(Packet::RoomFull) => {
                println!("Room {} is full", args.room);
                break;
            }
            Ok(Packet::PlayerJoined { id, name, .. }) => println!("{} joined as {}", name, id),
            Ok(Packet::PlayerLeft { id }) => println!("Player {} left", id),
            Ok(Packet::UpdatePlayersList { count }) => println!("{} players in room", count),
            Ok(Packet::UpdateScore { id, score: new_score }) => {
                if id == client_id {
                    score = new_score;
                }
                println!("Player {} scored: {}", id, new_score);
            }
            Ok(Packet::PlayerDied { id }) => println!("Player {} died", id),
            Ok(Packet::GameOver) => {
                println!("Game over");
                break;
            }
            Ok(Packet::Disconnected { reason }) => {
                println!("Disconnected by server: {}", reason);
                return Ok(());
            }
            Ok(other) => println!("Unexpected packet: {:?}", other),
            Err(e) => println!("Failed to deserialize packet: {}", e),
        }
    }

    println!("Sending disconnect request");
    send(&socket, &Packet::Disconnect, args.server).await?;

    println!(
        "Test client finished with score {} after {} ms",
        score,
        get_timestamp().saturating_sub(started_at)
    );
    Ok(())
}
