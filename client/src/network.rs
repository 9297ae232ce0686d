use log::debug;
use shared::{QueryRequest, QueryResponse, MAX_DATAGRAM_SIZE};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// Server status returned by a completed query exchange.
#[derive(Debug, Clone)]
pub struct ServerStatus {
    pub information: HashMap<String, String>,
    pub players: Vec<String>,
}

/// A query client bound to one local socket.
///
/// The server derives tokens from the sender's address, so the token
/// obtained by [`handshake`] is only valid for requests sent from this
/// same socket.
///
/// [`handshake`]: QueryClient::handshake
pub struct QueryClient {
    socket: UdpSocket,
    server_addr: SocketAddr,
    sequence: i32,
    recv_timeout: Duration,
}

impl QueryClient {
    pub async fn new(
        server_addr: &str,
        recv_timeout: Duration,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let server_addr = server_addr.parse()?;

        Ok(QueryClient {
            socket,
            server_addr,
            sequence: 0,
            recv_timeout,
        })
    }

    fn next_sequence(&mut self) -> i32 {
        self.sequence = self.sequence.wrapping_add(1);
        self.sequence
    }

    async fn exchange(
        &mut self,
        request: &QueryRequest,
    ) -> Result<QueryResponse, Box<dyn std::error::Error>> {
        let data = shared::encode_request(request)?;
        self.socket.send_to(&data, self.server_addr).await?;

        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        let (len, _) = timeout(self.recv_timeout, self.socket.recv_from(&mut buf))
            .await
            .map_err(|_| "timed out waiting for a reply; the server may have dropped the request")??;

        Ok(shared::decode_response(&buf[..len])?)
    }

    /// Obtains a challenge token for this client's address.
    pub async fn handshake(&mut self) -> Result<i32, Box<dyn std::error::Error>> {
        let sequence = self.next_sequence();
        let response = self.exchange(&QueryRequest::Handshake { sequence }).await?;

        match response {
            QueryResponse::Handshake {
                sequence: echoed,
                token,
            } if echoed == sequence => {
                debug!("Handshake complete, token {}", token);
                Ok(token)
            }
            other => Err(format!("unexpected handshake reply: {:?}", other).into()),
        }
    }

    /// Retrieves the server's information map and player roster using a
    /// token from a previous [`handshake`](QueryClient::handshake).
    pub async fn information(
        &mut self,
        token: i32,
    ) -> Result<ServerStatus, Box<dyn std::error::Error>> {
        let sequence = self.next_sequence();
        let response = self
            .exchange(&QueryRequest::Information { sequence, token })
            .await?;

        match response {
            QueryResponse::Information {
                sequence: echoed_sequence,
                token: echoed_token,
                information,
                players,
            } if echoed_sequence == sequence && echoed_token == token => Ok(ServerStatus {
                information,
                players,
            }),
            other => Err(format!("unexpected information reply: {:?}", other).into()),
        }
    }

    /// Runs the full two-phase exchange: handshake, then information.
    pub async fn status(&mut self) -> Result<ServerStatus, Box<dyn std::error::Error>> {
        let token = self.handshake().await?;
        self.information(token).await
    }
}
