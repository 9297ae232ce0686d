//! # Query Server Library
//!
//! This library implements the server side of a minimal UDP status-query
//! protocol. Game servers embed it to let external tools discover server
//! metadata and the current player roster without performing a full
//! game-protocol handshake.
//!
//! ## Protocol Overview
//!
//! The protocol has exactly two request kinds, exchanged as single
//! datagrams of at most 512 bytes:
//!
//! ### Handshake
//! The first phase. The client obtains a challenge token derived from the
//! server's secret and the client's own source address. No server data is
//! revealed at this stage.
//!
//! ### Information
//! The second phase, gated by the token. The server re-derives the token
//! for the sender's address and compares it against the one presented;
//! only on a match does it reply with the information map and player
//! roster. A forged or stale token produces no reply at all, so an
//! attacker probing tokens learns nothing they could not learn from
//! packet loss.
//!
//! ## Architecture Design
//!
//! ### Stateless Token Verification
//! Tokens are recomputed, never stored. The server keeps one secret for
//! its whole lifetime and derives each client's token on demand with a
//! keyed hash, so there is no per-client table to fill, expire, or clean
//! up.
//!
//! ### Independently Locked State
//! The information map and player roster each sit behind their own
//! exclusive lock. Administrative updates to one never contend with the
//! other, at the documented cost that a single reply's two snapshots are
//! not atomic with respect to each other.
//!
//! ### Single Serve Task
//! One task owns the socket and runs the receive/reply loop. It suspends
//! only on the network receive or on the stop signal, and dispatch is
//! synchronous and fast, so no per-datagram timeouts or cancellation are
//! needed.
//!
//! ## Module Organization
//!
//! ### Query Module (`query`)
//! The responder itself: request dispatch, the UDP serve loop, and the
//! Unbound → Listening → Stopped lifecycle.
//!
//! ### State Module (`state`)
//! The server-exposed data (information map and player roster) with its
//! locking discipline.
//!
//! ### Token Module (`token`)
//! Challenge-token derivation from the process-lifetime secret.
//!
//! ### Error Module (`error`)
//! The error taxonomy separating fatal, per-datagram, and caller errors.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::query::QueryServer;
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut information = HashMap::new();
//!     information.insert("hostname".to_string(), "My Server".to_string());
//!
//!     let server = Arc::new(QueryServer::new(information, vec!["alice".to_string()]));
//!
//!     // The serve loop blocks its task until the server is closed.
//!     let responder = Arc::clone(&server);
//!     let handle = tokio::spawn(async move { responder.serve("127.0.0.1:19132").await });
//!
//!     // Administrative updates may happen at any time from any task.
//!     server.set_players(vec!["alice".to_string(), "bob".to_string()]).await;
//!
//!     // Stop the responder. The serve loop exits cleanly with Ok(()).
//!     server.close().await?;
//!     handle.await??;
//!
//!     Ok(())
//! }
//! ```
//!
//! A stopped server cannot be restarted; construct a new instance to serve
//! again.

pub mod error;
pub mod query;
pub mod state;
pub mod token;
