use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::RETENTION_SECS;

/// An anonymous session token. Holding the id is the only proof of authorship.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: i64,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            created_at: now,
            expires_at: now.timestamp() + RETENTION_SECS,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_creation() {
        let session = Session::new();

        assert_eq!(
            session.expires_at - session.created_at.timestamp(),
            RETENTION_SECS
        );
        assert_ne!(session.session_id, Session::new().session_id);
    }

    #[test]
    fn test_default_session_is_fresh() {
        let session = Session::default();

        assert_eq!(
            session.expires_at - session.created_at.timestamp(),
            RETENTION_SECS
        );
    }
}
