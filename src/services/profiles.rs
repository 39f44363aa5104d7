use crate::models::RawProfile;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A submitted profile and when it was saved
#[derive(Debug, Clone)]
pub struct StoredProfile {
    pub profile: RawProfile,
    pub updated_at: DateTime<Utc>,
}

/// In-memory profile storage keyed by account id
///
/// Writes replace the previous profile wholesale (last write wins).
#[derive(Default)]
pub struct ProfileStore {
    profiles: RwLock<HashMap<String, StoredProfile>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a profile, replacing any earlier one for the same user
    pub async fn put(&self, user_id: &str, profile: RawProfile) -> StoredProfile {
        let stored = StoredProfile {
            profile,
            updated_at: Utc::now(),
        };

        self.profiles
            .write()
            .await
            .insert(user_id.to_string(), stored.clone());

        tracing::debug!("Stored profile for {}", user_id);
        stored
    }

    pub async fn get(&self, user_id: &str) -> Option<StoredProfile> {
        self.profiles.read().await.get(user_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}
