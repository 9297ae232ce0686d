//! Performance and distribution checks for the responder's hot paths.

use server::token::TokenGenerator;
use std::collections::HashSet;
use std::time::Instant;

/// Benchmarks token derivation throughput
#[test]
fn benchmark_token_derivation() {
    let generator = TokenGenerator::new();

    let iterations = 100_000;
    let start = Instant::now();

    for i in 0..iterations {
        let _ = generator.derive(&format!("192.168.0.{}:{}", i % 256, 1024 + (i % 40000)));
    }

    let duration = start.elapsed();
    println!(
        "Token derivation: {} iterations in {:?} ({:.2} ns/iter)",
        iterations,
        duration,
        duration.as_nanos() as f64 / iterations as f64
    );

    // Should complete in under 1 second for 100k derivations
    assert!(duration.as_millis() < 1000);
}

/// Tokens over many sampled addresses behave like a well-distributed hash:
/// collisions stay near the birthday bound for a 32-bit output.
#[test]
fn token_distribution_over_addresses() {
    let generator = TokenGenerator::new();

    let samples = 10_000;
    let mut seen = HashSet::new();

    for i in 0..samples {
        let addr = format!(
            "10.{}.{}.{}:{}",
            (i >> 16) & 0xFF,
            (i >> 8) & 0xFF,
            i & 0xFF,
            19132 + (i % 1000)
        );
        seen.insert(generator.derive(&addr));
    }

    let collisions = samples - seen.len();
    println!(
        "Token distribution: {} addresses, {} collisions",
        samples, collisions
    );

    // Expected collisions for 10k samples over a 32-bit space is ~0.01;
    // anything beyond a handful means the derivation is broken.
    assert!(collisions <= 3, "too many token collisions: {}", collisions);
}

/// Benchmarks the wire codec on a representative information response
#[test]
fn benchmark_codec_roundtrip() {
    use shared::QueryResponse;
    use std::collections::HashMap;

    let mut information = HashMap::new();
    information.insert("hostname".to_string(), "A Rust Game Server".to_string());
    information.insert("map".to_string(), "world".to_string());
    information.insert("numplayers".to_string(), "16".to_string());

    let players = (0..16).map(|i| format!("player{}", i)).collect();

    let response = QueryResponse::Information {
        sequence: 1,
        token: 123456,
        information,
        players,
    };

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let encoded = shared::encode_response(&response).unwrap();
        let _ = shared::decode_response(&encoded).unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Codec roundtrip: {} iterations in {:?} ({:.2} µs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 2 seconds
    assert!(duration.as_millis() < 2000);
}

/// Benchmarks full dispatch (decode, verify, snapshot, encode)
#[tokio::test]
async fn benchmark_dispatch() {
    use server::query::QueryServer;
    use shared::{QueryRequest, QueryResponse};
    use std::collections::HashMap;
    use std::net::SocketAddr;

    let mut information = HashMap::new();
    information.insert("hostname".to_string(), "srv1".to_string());
    let server = QueryServer::new(information, vec!["alice".to_string(), "bob".to_string()]);

    let peer: SocketAddr = "127.0.0.1:54321".parse().unwrap();

    let handshake = shared::encode_request(&QueryRequest::Handshake { sequence: 1 }).unwrap();
    let reply = server.handle(&handshake, peer).await.unwrap();
    let token = match shared::decode_response(&reply).unwrap() {
        QueryResponse::Handshake { token, .. } => token,
        other => panic!("Expected a handshake reply, got {:?}", other),
    };

    let information_request =
        shared::encode_request(&QueryRequest::Information { sequence: 2, token }).unwrap();

    let iterations = 10_000;
    let start = Instant::now();

    for _ in 0..iterations {
        let _ = server.handle(&information_request, peer).await.unwrap();
    }

    let duration = start.elapsed();
    println!(
        "Dispatch: {} information requests in {:?} ({:.2} µs/iter)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 5 seconds
    assert!(duration.as_millis() < 5000);
}
