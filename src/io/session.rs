use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::io::slot::{JsonSlot, SlotRead};
use crate::model::session::Session;

pub const SESSION_FILE: &str = "session.json";

/// Durable storage for the bearer credential and user
#[derive(Debug, Clone)]
pub struct SessionSlot {
    slot: JsonSlot,
}

impl SessionSlot {
    pub fn in_dir(data_dir: &Path) -> Self {
        SessionSlot {
            slot: JsonSlot::new(data_dir.join(SESSION_FILE)),
        }
    }

    /// The stored session, if one exists and parses
    pub fn load(&self) -> Option<Session> {
        match self.slot.read::<Session>() {
            SlotRead::Loaded(s) if !s.token.is_empty() => Some(s),
            SlotRead::Loaded(_) | SlotRead::Missing => None,
            SlotRead::Corrupt(e) => {
                warn!(path = %self.slot.path().display(), error = %e, "ignoring unreadable session");
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> io::Result<()> {
        info!(user = %session.user.username, "session stored");
        self.slot.write(session)
    }

    pub fn clear(&self) -> io::Result<()> {
        info!("session cleared");
        self.slot.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::session::User;
    use tempfile::TempDir;

    fn session() -> Session {
        Session {
            token: "tok".into(),
            user: User {
                id: "u1".into(),
                username: "ann".into(),
                email: "ann@example.com".into(),
            },
        }
    }

    #[test]
    fn save_load_clear() {
        let dir = TempDir::new().unwrap();
        let slot = SessionSlot::in_dir(dir.path());
        assert!(slot.load().is_none());
        slot.save(&session()).unwrap();
        assert_eq!(slot.load(), Some(session()));
        slot.clear().unwrap();
        assert!(slot.load().is_none());
    }

    #[test]
    fn corrupt_session_reads_as_logged_out() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SESSION_FILE), "{\"token\":").unwrap();
        assert!(SessionSlot::in_dir(dir.path()).load().is_none());
    }
}
