//! File-backed persistence for callbell.
//!
//! One TOML file per record under the data directory:
//!
//! ```text
//! <data>/users/<userId>.toml
//! <data>/credentials/<userId>.toml
//! <data>/reminders/<userId>/<eventSlug>__<startUtc>.toml
//! ```
//!
//! The reminder files double as the idempotency gate: they are created
//! with `create_new`, so a second writer for the same composite key loses
//! atomically at the filesystem level.

mod credentials;
mod ledger;
mod users;

pub use ledger::ReminderRecord;
pub use users::{UserProfile, UserWithPhone};

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CallbellError, CallbellResult};

/// Default data directory, e.g. `~/.local/share/callbell` on Linux.
pub fn default_data_dir() -> CallbellResult<PathBuf> {
    Ok(dirs::data_dir()
        .ok_or_else(|| CallbellError::Config("Could not determine data directory".into()))?
        .join("callbell"))
}

/// Make an identifier safe for use as a file name component.
fn file_slug(s: &str) -> String {
    s.replace(['/', '\\', ':'], "_")
}

/// File-backed store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        FileStore { base: base.into() }
    }

    fn users_dir(&self) -> PathBuf {
        self.base.join("users")
    }

    fn credentials_dir(&self) -> PathBuf {
        self.base.join("credentials")
    }

    fn reminders_dir(&self, user_id: &str) -> PathBuf {
        self.base.join("reminders").join(file_slug(user_id))
    }

    fn read_toml<T: DeserializeOwned>(path: &Path) -> CallbellResult<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        let value = toml::from_str(&contents).map_err(|e| {
            CallbellError::Serialization(format!("Failed to parse {}: {e}", path.display()))
        })?;
        Ok(Some(value))
    }

    fn write_toml<T: Serialize>(path: &Path, value: &T) -> CallbellResult<()> {
        let contents = toml::to_string_pretty(value).map_err(|e| {
            CallbellError::Serialization(format!("Failed to serialize {}: {e}", path.display()))
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}
