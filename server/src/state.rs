//! Server-exposed status data guarded for concurrent administrative updates.

use std::collections::HashMap;
use tokio::sync::Mutex;

/// The two independently mutable pieces of server-exposed data.
///
/// The information map and the player roster are guarded by separate locks
/// so that updating one never blocks on the other. The flip side is that
/// there is no cross-field atomicity: a reader taking both snapshots may
/// observe an information map and a roster written by different
/// administrative updates. That trade-off is accepted; callers that need
/// both take the information lock first, then the roster lock, one at a
/// time and never nested.
pub struct QueryState {
    information: Mutex<HashMap<String, String>>,
    players: Mutex<Vec<String>>,
}

impl QueryState {
    pub fn new(information: HashMap<String, String>, players: Vec<String>) -> Self {
        Self {
            information: Mutex::new(information),
            players: Mutex::new(players),
        }
    }

    /// Replaces the information map wholesale.
    pub async fn set_information(&self, information: HashMap<String, String>) {
        *self.information.lock().await = information;
    }

    /// Inserts or updates a single information entry.
    pub async fn set(&self, key: String, value: String) {
        self.information.lock().await.insert(key, value);
    }

    /// Replaces the player roster wholesale.
    pub async fn set_players(&self, players: Vec<String>) {
        *self.players.lock().await = players;
    }

    /// Clones the information map under its lock; the lock is released
    /// before this returns.
    pub async fn snapshot_information(&self) -> HashMap<String, String> {
        self.information.lock().await.clone()
    }

    /// Clones the player roster under its lock; the lock is released before
    /// this returns.
    pub async fn snapshot_players(&self) -> Vec<String> {
        self.players.lock().await.clone()
    }
}
