use clap::Parser;
use client::network::QueryClient;
use log::info;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Query endpoint to contact
    #[arg(short = 's', long, default_value = "127.0.0.1:19132")]
    server: String,

    /// How long to wait for each reply, in milliseconds
    #[arg(short = 't', long, default_value = "1000")]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();

    info!("Querying {}", args.server);

    let mut client = QueryClient::new(&args.server, Duration::from_millis(args.timeout_ms)).await?;
    let status = client.status().await?;

    println!("Server information:");
    let mut entries: Vec<_> = status.information.iter().collect();
    entries.sort();
    for (key, value) in entries {
        println!("  {} = {}", key, value);
    }

    println!("Players online: {}", status.players.len());
    for player in &status.players {
        println!("  {}", player);
    }

    Ok(())
}
