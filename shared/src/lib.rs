use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Every query datagram is a single complete message no larger than this.
pub const MAX_DATAGRAM_SIZE: usize = 512;

/// Inbound query messages, one per datagram.
///
/// The set of request kinds is closed: a datagram carrying any other tag
/// fails to decode and is dropped by the responder.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum QueryRequest {
    /// First phase: obtain a challenge token without revealing server data.
    Handshake { sequence: i32 },
    /// Second phase: retrieve server status, gated by the token issued to
    /// this client's address during the handshake.
    Information { sequence: i32, token: i32 },
}

/// Outbound query messages, mirroring the request kind.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum QueryResponse {
    /// Carries the freshly issued token; `sequence` echoes the request.
    Handshake { sequence: i32, token: i32 },
    /// Echoes `sequence` and the validated `token` along with snapshots of
    /// the server information map and player roster.
    Information {
        sequence: i32,
        token: i32,
        information: HashMap<String, String>,
        players: Vec<String>,
    },
}

/// Decodes one inbound datagram into a request.
pub fn decode_request(buf: &[u8]) -> bincode::Result<QueryRequest> {
    bincode::deserialize(buf)
}

/// Encodes a request into a single datagram payload.
pub fn encode_request(request: &QueryRequest) -> bincode::Result<Vec<u8>> {
    bincode::serialize(request)
}

/// Decodes one inbound datagram into a response.
pub fn decode_response(buf: &[u8]) -> bincode::Result<QueryResponse> {
    bincode::deserialize(buf)
}

/// Encodes a response into a single datagram payload.
pub fn encode_response(response: &QueryResponse) -> bincode::Result<Vec<u8>> {
    bincode::serialize(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_request_roundtrip() {
        let request = QueryRequest::Handshake { sequence: 7 };
        let encoded = encode_request(&request).unwrap();
        let decoded = decode_request(&encoded).unwrap();

        match decoded {
            QueryRequest::Handshake { sequence } => assert_eq!(sequence, 7),
            _ => panic!("Wrong request kind after roundtrip"),
        }
    }

    #[test]
    fn test_information_request_roundtrip() {
        let request = QueryRequest::Information {
            sequence: -3,
            token: 0x5EAF00D,
        };
        let encoded = encode_request(&request).unwrap();
        let decoded = decode_request(&encoded).unwrap();

        match decoded {
            QueryRequest::Information { sequence, token } => {
                assert_eq!(sequence, -3);
                assert_eq!(token, 0x5EAF00D);
            }
            _ => panic!("Wrong request kind after roundtrip"),
        }
    }

    #[test]
    fn test_information_response_roundtrip() {
        let mut information = HashMap::new();
        information.insert("hostname".to_string(), "srv1".to_string());
        information.insert("map".to_string(), "plains".to_string());

        let response = QueryResponse::Information {
            sequence: 2,
            token: 42,
            information: information.clone(),
            players: vec!["alice".to_string(), "bob".to_string()],
        };

        let encoded = encode_response(&response).unwrap();
        let decoded = decode_response(&encoded).unwrap();

        match decoded {
            QueryResponse::Information {
                sequence,
                token,
                information: info,
                players,
            } => {
                assert_eq!(sequence, 2);
                assert_eq!(token, 42);
                assert_eq!(info, information);
                assert_eq!(players, vec!["alice", "bob"]);
            }
            _ => panic!("Wrong response kind after roundtrip"),
        }
    }

    #[test]
    fn test_malformed_bytes_rejected() {
        let valid = encode_request(&QueryRequest::Handshake { sequence: 1 }).unwrap();

        // Truncated datagram
        let result = decode_request(&valid[..valid.len() / 2]);
        assert!(result.is_err(), "Should reject a truncated datagram");

        // Unknown request kind: corrupt the enum tag
        let mut unknown_kind = valid.clone();
        unknown_kind[0] = 0xFF;
        let result = decode_request(&unknown_kind);
        assert!(result.is_err(), "Should reject an unrecognized request kind");

        // Empty datagram
        let result = decode_request(&[]);
        assert!(result.is_err(), "Should reject an empty datagram");
    }

    #[test]
    fn test_typical_response_fits_one_datagram() {
        let mut information = HashMap::new();
        information.insert("hostname".to_string(), "A Rust Game Server".to_string());
        information.insert("gametype".to_string(), "SMP".to_string());
        information.insert("map".to_string(), "world".to_string());
        information.insert("numplayers".to_string(), "8".to_string());
        information.insert("maxplayers".to_string(), "20".to_string());

        let players = (0..8).map(|i| format!("player{}", i)).collect();

        let response = QueryResponse::Information {
            sequence: 1,
            token: i32::MAX,
            information,
            players,
        };

        let encoded = encode_response(&response).unwrap();
        assert!(encoded.len() <= MAX_DATAGRAM_SIZE);
    }
}
