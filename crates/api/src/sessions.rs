//! Per-user monitoring switches.
//!
//! Users flip their flag through `/session/start` and `/session/stop`. The
//! snapshot recorder reads it to decide whose history to write; the
//! broadcast loop never looks at it.

use std::collections::HashMap;
use std::sync::Arc;

use khm_core::types::DbId;
use tokio::sync::RwLock;

/// Shared map of user id to "monitoring active".
#[derive(Debug, Clone, Default)]
pub struct SessionFlags {
    flags: Arc<RwLock<HashMap<DbId, bool>>>,
}

impl SessionFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn start(&self, user_id: DbId) {
        self.flags.write().await.insert(user_id, true);
    }

    pub async fn stop(&self, user_id: DbId) {
        self.flags.write().await.insert(user_id, false);
    }

    /// Users that never touched the switch count as inactive.
    pub async fn is_active(&self, user_id: DbId) -> bool {
        self.flags
            .read()
            .await
            .get(&user_id)
            .copied()
            .unwrap_or(false)
    }

    /// Ids of all users whose flag is currently on, in ascending order.
    pub async fn active_users(&self) -> Vec<DbId> {
        let mut users: Vec<DbId> = self
            .flags
            .read()
            .await
            .iter()
            .filter_map(|(id, active)| active.then_some(*id))
            .collect();
        users.sort_unstable();
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn start_and_stop_toggle_the_flag() {
        let flags = SessionFlags::new();
        assert!(!flags.is_active(1).await);

        flags.start(1).await;
        flags.start(3).await;
        assert!(flags.is_active(1).await);
        assert_eq!(flags.active_users().await, vec![1, 3]);

        flags.stop(1).await;
        assert!(!flags.is_active(1).await);
        assert_eq!(flags.active_users().await, vec![3]);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let flags = SessionFlags::new();
        let other = flags.clone();
        other.start(9).await;
        assert!(flags.is_active(9).await);
    }
}
