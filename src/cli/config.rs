use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted login state of the CLI
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub server: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|at| at <= Utc::now()).unwrap_or(false)
    }

    /// Token usable for the next request, if any
    pub fn active_token(&self) -> Option<&str> {
        if self.is_expired() {
            return None;
        }
        self.token.as_deref()
    }

    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let session_file = dir.join("session.json");

        if !session_file.exists() {
            return Ok(Session::default());
        }

        let content = fs::read_to_string(session_file)?;
        let session: Session = serde_json::from_str(&content)?;
        Ok(session)
    }

    pub fn save_to(&self, dir: &Path) -> anyhow::Result<()> {
        let session_file = dir.join("session.json");

        let content = serde_json::to_string_pretty(self)?;
        fs::write(session_file, content)?;
        Ok(())
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("TODO_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("todo-api").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<Session> {
    Session::load_from(&get_config_dir()?)
}

pub fn save_session(session: &Session) -> anyhow::Result<()> {
    session.save_to(&get_config_dir()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("todo-cli-{}", uuid::Uuid::new_v4().simple()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_session_file_is_empty_session() {
        let dir = scratch_dir();
        assert_eq!(Session::load_from(&dir).unwrap(), Session::default());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn session_round_trips_through_disk() {
        let dir = scratch_dir();
        let session = Session {
            server: Some("http://localhost:3000".to_string()),
            username: Some("alice".to_string()),
            token: Some("abc".to_string()),
            expires_at: Some(Utc::now() + Duration::hours(1)),
        };
        session.save_to(&dir).unwrap();

        let loaded = Session::load_from(&dir).unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.active_token(), Some("abc"));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn expired_session_has_no_active_token() {
        let session = Session {
            token: Some("old".to_string()),
            expires_at: Some(Utc::now() - Duration::minutes(1)),
            ..Session::default()
        };
        assert!(session.is_expired());
        assert_eq!(session.active_token(), None);
    }
}
