use clap::Parser;
use server::network::Server;
use server::room::RoomConfig;
use std::time::Duration;

/// Authoritative arena room server.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Server port to listen on
    #[clap(short, long, default_value = "8080")]
    port: u16,
    /// Driver tick rate (updates per second); the simulation itself always
    /// steps at 60 Hz
    #[clap(short, long, default_value = "60")]
    tick_rate: u32,
    /// Maximum simultaneous players
    #[clap(short, long, default_value = "10")]
    max_clients: usize,
    /// Do not replicate full body chains for client-side debug display
    #[clap(long)]
    no_debug_circles: bool,
    /// Do not add a bot player when the room first becomes occupied
    #[clap(long)]
    no_bot: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    let room_config = RoomConfig {
        debug_circles: !args.no_debug_circles,
        spawn_bot: !args.no_bot,
        ..RoomConfig::default()
    };

    let address = format!("{}:{}", args.host, args.port);
    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(args.tick_rate.max(1)));

    let mut server = Server::new(&address, tick_duration, args.max_clients, room_config).await?;

    tokio::select! {
        result = server.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            println!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
