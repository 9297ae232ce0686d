//! Error taxonomy for the query responder.

use thiserror::Error;

/// Everything that can go wrong while answering queries.
///
/// [`QueryError::Io`] during binding and [`QueryError::AlreadyServed`] are
/// fatal to a `serve` call. The per-datagram variants (`Decode`,
/// `TokenMismatch`, `Encode`) cause that datagram to be dropped without a
/// reply, which to the sender is indistinguishable from packet loss.
/// [`QueryError::NotListening`] reports a misuse of `close`.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Resolving or binding the serve address failed, or a socket operation
    /// raised an error the caller should see.
    #[error("query socket error: {0}")]
    Io(#[from] std::io::Error),

    /// The datagram did not decode as a known request kind.
    #[error("malformed query request: {0}")]
    Decode(#[source] bincode::Error),

    /// An information request presented a token that was not issued for the
    /// sender's address.
    #[error("mismatched challenge token")]
    TokenMismatch,

    /// Encoding the response failed.
    #[error("failed to encode query response: {0}")]
    Encode(#[source] bincode::Error),

    /// `close` was called while no listener is active, either because the
    /// server never bound or because it already stopped.
    #[error("no active listener to close")]
    NotListening,

    /// `serve` was called on an instance that is already listening or has
    /// stopped. A stopped server cannot be restarted.
    #[error("serve loop already started")]
    AlreadyServed,
}
