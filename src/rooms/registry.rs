use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::OnceCell;

use crate::error::{AppError, Result};
use crate::video::{MediaMode, VideoPlatform};

/// Process-local map from room name to provider session id.
///
/// Each room owns a `OnceCell`, so concurrent first visits share a single
/// in-flight creation. A failed creation leaves the cell empty and the next
/// visit retries it. A mapping, once set, never changes. Nothing is evicted
/// and nothing survives a restart.
pub struct RoomRegistry {
    platform: Arc<dyn VideoPlatform>,
    sessions: DashMap<String, Arc<OnceCell<String>>>,
}

impl RoomRegistry {
    pub fn new(platform: Arc<dyn VideoPlatform>) -> Self {
        Self {
            platform,
            sessions: DashMap::new(),
        }
    }

    /// Return the provider session for `room_id`, creating it on first use.
    pub async fn get_or_create_session(&self, room_id: &str) -> Result<String> {
        // Clone the cell out so no shard lock is held across the await.
        let cell = self
            .sessions
            .entry(room_id.to_string())
            .or_default()
            .clone();

        let result = cell
            .get_or_try_init(|| async {
                let session_id = self.platform.create_session(MediaMode::Routed).await?;
                tracing::info!(room_id = %room_id, session_id = %session_id, "Room created");
                Ok::<_, AppError>(session_id)
            })
            .await;

        match result {
            Ok(session_id) => Ok(session_id.clone()),
            Err(e) => {
                tracing::warn!(room_id = %room_id, error = %e, "Room creation failed");
                Err(e)
            }
        }
    }

    /// Session id of an already created room.
    pub fn session_for(&self, room_id: &str) -> Option<String> {
        self.sessions
            .get(room_id)
            .and_then(|cell| cell.value().get().cloned())
    }

    /// Number of rooms with a provider session.
    pub fn len(&self) -> usize {
        self.sessions
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
