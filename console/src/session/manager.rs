//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Bookkeeping for one open console session
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: Uuid,
    pub peer_addr: String,
    pub connected_at: DateTime<Utc>,
}

/// Tracks which console sessions are currently open
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<Uuid, SessionInfo>>>,
}

impl SessionManager {
    /// Create an empty session manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly opened session and return its id
    pub async fn open(&self, peer_addr: String) -> Uuid {
        let info = SessionInfo {
            id: Uuid::new_v4(),
            peer_addr,
            connected_at: Utc::now(),
        };
        let id = info.id;

        let mut sessions = self.sessions.write().await;
        sessions.insert(id, info);
        metrics::gauge!("console.sessions.active").set(sessions.len() as f64);
        metrics::counter!("console.sessions.opened").increment(1);
        id
    }

    /// Forget a closed session
    pub async fn close(&self, id: Uuid) -> Option<SessionInfo> {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(&id);
        metrics::gauge!("console.sessions.active").set(sessions.len() as f64);
        removed
    }

    /// All open sessions, oldest first
    pub async fn list(&self) -> Vec<SessionInfo> {
        let sessions = self.sessions.read().await;
        let mut list: Vec<SessionInfo> = sessions.values().cloned().collect();
        list.sort_by_key(|info| info.connected_at);
        list
    }

    /// Get session count
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
