//! Per-user OAuth token storage.

use std::path::PathBuf;

use crate::credentials::TokenData;
use crate::error::CallbellResult;

use super::{FileStore, file_slug};

impl FileStore {
    fn credential_path(&self, user_id: &str) -> PathBuf {
        self.credentials_dir()
            .join(format!("{}.toml", file_slug(user_id)))
    }

    pub fn credential(&self, user_id: &str) -> CallbellResult<Option<TokenData>> {
        Self::read_toml(&self.credential_path(user_id))
    }

    pub fn save_credential(&self, user_id: &str, tokens: &TokenData) -> CallbellResult<()> {
        let path = self.credential_path(user_id);
        Self::write_toml(&path, tokens)?;

        // Owner-only (0600) since the file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}
