//! Query responder dispatch and UDP serve loop.

use crate::error::QueryError;
use crate::state::QueryState;
use crate::token::TokenGenerator;
use log::{info, warn};
use shared::{QueryRequest, QueryResponse, MAX_DATAGRAM_SIZE};
use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::net::UdpSocket;
use tokio::sync::{watch, Mutex};

/// Serve-loop lifecycle. A server binds at most once and cannot be
/// restarted after it stops; a new instance must be constructed instead.
enum Phase {
    Unbound,
    Listening { stop: watch::Sender<bool> },
    Stopped,
}

/// UDP status-query responder.
///
/// Owns the server-exposed status data and the challenge-token secret,
/// dispatches decoded requests, and runs the receive/reply loop. The
/// administrative methods may be called concurrently with [`serve`] from
/// any task; share the instance behind an [`std::sync::Arc`].
///
/// [`serve`]: QueryServer::serve
pub struct QueryServer {
    state: QueryState,
    tokens: TokenGenerator,
    phase: Mutex<Phase>,
    local_addr: Mutex<Option<SocketAddr>>,
}

impl QueryServer {
    /// Creates a responder seeded with an initial information map and
    /// player roster. The token secret is drawn here and lives as long as
    /// the instance.
    pub fn new(information: HashMap<String, String>, players: Vec<String>) -> Self {
        Self {
            state: QueryState::new(information, players),
            tokens: TokenGenerator::new(),
            phase: Mutex::new(Phase::Unbound),
            local_addr: Mutex::new(None),
        }
    }

    /// Replaces the information map wholesale.
    pub async fn set_information(&self, information: HashMap<String, String>) {
        self.state.set_information(information).await;
    }

    /// Inserts or updates a single information entry.
    pub async fn set(&self, key: String, value: String) {
        self.state.set(key, value).await;
    }

    /// Replaces the player roster wholesale.
    pub async fn set_players(&self, players: Vec<String>) {
        self.state.set_players(players).await;
    }

    /// The address the serve loop is bound to, once listening. Useful when
    /// serving on port 0.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock().await
    }

    /// Interprets one inbound datagram from `peer` and produces the encoded
    /// reply to transmit.
    ///
    /// Handshake requests are answered with a token derived for the
    /// sender's address and never touch state. Information requests are
    /// verified by re-deriving that token; on a match the reply carries
    /// snapshots of the information map and player roster. Any error means
    /// the datagram is dropped and no reply is sent.
    pub async fn handle(&self, datagram: &[u8], peer: SocketAddr) -> Result<Vec<u8>, QueryError> {
        let request = shared::decode_request(datagram).map_err(QueryError::Decode)?;

        let response = match request {
            QueryRequest::Handshake { sequence } => {
                let token = self.tokens.derive(&peer.to_string());
                QueryResponse::Handshake { sequence, token }
            }
            QueryRequest::Information { sequence, token } => {
                if token != self.tokens.derive(&peer.to_string()) {
                    return Err(QueryError::TokenMismatch);
                }
                // Two separate critical sections, information before
                // players. The pair is not atomic across concurrent writers.
                let information = self.state.snapshot_information().await;
                let players = self.state.snapshot_players().await;
                QueryResponse::Information {
                    sequence,
                    token,
                    information,
                    players,
                }
            }
        };

        shared::encode_response(&response).map_err(QueryError::Encode)
    }

    /// Binds `addr` and runs the receive/reply loop until [`close`] is
    /// called.
    ///
    /// Blocks the calling task. A resolve or bind failure is returned
    /// immediately and leaves the server unbound. Once listening, receive
    /// errors are transient and dispatch errors drop the offending datagram;
    /// neither terminates the loop. A clean stop returns `Ok(())`.
    ///
    /// [`close`]: QueryServer::close
    pub async fn serve(&self, addr: &str) -> Result<(), QueryError> {
        let (socket, local, mut stop_rx) = {
            let mut phase = self.phase.lock().await;
            if !matches!(*phase, Phase::Unbound) {
                return Err(QueryError::AlreadyServed);
            }

            // A bind failure returns here with the phase still Unbound.
            let socket = UdpSocket::bind(addr).await?;
            let local = socket.local_addr()?;
            *self.local_addr.lock().await = Some(local);

            let (stop_tx, stop_rx) = watch::channel(false);
            *phase = Phase::Listening { stop: stop_tx };
            (socket, local, stop_rx)
        };

        info!("Query server listening on {}", local);

        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        loop {
            tokio::select! {
                _ = stop_rx.changed() => {
                    info!("Query server on {} stopped", local);
                    return Ok(());
                }
                received = socket.recv_from(&mut buf) => {
                    let (len, peer) = match received {
                        Ok(received) => received,
                        Err(e) => {
                            // Transient: the loop keeps receiving.
                            warn!("Receive error: {}", e);
                            continue;
                        }
                    };

                    match self.handle(&buf[..len], peer).await {
                        Ok(reply) => {
                            if let Err(e) = socket.send_to(&reply, peer).await {
                                warn!("Failed to send reply to {}: {}", peer, e);
                            }
                        }
                        // Malformed and spoofed datagrams get no reply; to
                        // the sender this looks like packet loss.
                        Err(e) => warn!("Dropping datagram from {}: {}", peer, e),
                    }
                }
            }
        }
    }

    /// Signals the serve loop to stop and marks the server stopped.
    ///
    /// Errors with [`QueryError::NotListening`] if the server never bound
    /// or was already stopped; stopping is not idempotent.
    pub async fn close(&self) -> Result<(), QueryError> {
        let mut phase = self.phase.lock().await;
        match std::mem::replace(&mut *phase, Phase::Stopped) {
            Phase::Listening { stop } => {
                // The serve loop observes the change, interrupts its pending
                // receive, and exits cleanly.
                let _ = stop.send(true);
                Ok(())
            }
            previous => {
                *phase = previous;
                Err(QueryError::NotListening)
            }
        }
    }
}
