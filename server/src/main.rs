use clap::Parser;
use log::info;
use server::query::QueryServer;
use std::collections::HashMap;
use std::sync::Arc;

/// Main-method of the application.
/// Parses command-line arguments, seeds the query state, and answers
/// status queries until Ctrl+C.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Command line arguments
    #[derive(Parser, Debug)]
    #[clap(author, version, about)]
    struct Args {
        /// Server IP address to bind to
        #[clap(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        /// Server port to listen on
        #[clap(short, long, default_value = "19132")]
        port: u16,
        /// Information entry as key=value; repeat for multiple entries
        #[clap(short, long = "info", value_parser = parse_key_val)]
        info: Vec<(String, String)>,
        /// Player name seeding the roster; repeat for multiple players
        #[clap(long = "player")]
        players: Vec<String>,
    }

    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let information: HashMap<String, String> = args.info.into_iter().collect();
    let server = Arc::new(QueryServer::new(information, args.players));

    let address = format!("{}:{}", args.host, args.port);
    let mut serve_handle = {
        let server = Arc::clone(&server);
        tokio::spawn(async move { server.serve(&address).await })
    };

    tokio::select! {
        result = &mut serve_handle => {
            result??;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
            server.close().await?;
            serve_handle.await??;
        }
    }

    Ok(())
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected key=value, got '{}'", s)),
    }
}
