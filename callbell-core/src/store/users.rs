//! User profiles: the only field the core cares about is the phone number.

use serde::{Deserialize, Serialize};

use crate::error::{CallbellError, CallbellResult};
use crate::phone::is_valid_e164;

use super::{FileStore, file_slug};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub phone_number: Option<String>,
}

/// A user eligible for the reminder cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct UserWithPhone {
    pub user_id: String,
    pub phone_number: String,
}

impl FileStore {
    fn user_path(&self, user_id: &str) -> std::path::PathBuf {
        self.users_dir().join(format!("{}.toml", file_slug(user_id)))
    }

    pub fn user_phone(&self, user_id: &str) -> CallbellResult<Option<String>> {
        let profile: Option<UserProfile> = Self::read_toml(&self.user_path(user_id))?;
        Ok(profile.and_then(|p| p.phone_number))
    }

    /// Set a user's phone number. The number must already be normalized;
    /// anything that is not E.164 is rejected.
    pub fn set_user_phone(&self, user_id: &str, phone: &str) -> CallbellResult<()> {
        if !is_valid_e164(phone) {
            return Err(CallbellError::InvalidPhone(phone.to_string()));
        }
        let path = self.user_path(user_id);
        let mut profile: UserProfile = Self::read_toml(&path)?.unwrap_or_default();
        profile.phone_number = Some(phone.to_string());
        Self::write_toml(&path, &profile)
    }

    /// All users with a phone number set, ordered by user id so cycle
    /// reports are deterministic.
    pub fn users_with_phone(&self) -> CallbellResult<Vec<UserWithPhone>> {
        let dir = self.users_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut users = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "toml") {
                continue;
            }
            let Some(user_id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Some(profile) = Self::read_toml::<UserProfile>(&path)? else {
                continue;
            };
            if let Some(phone_number) = profile.phone_number {
                users.push(UserWithPhone {
                    user_id: user_id.to_string(),
                    phone_number,
                });
            }
        }

        users.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CallbellError;

    #[test]
    fn set_and_read_phone() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert_eq!(store.user_phone("alice").unwrap(), None);
        store.set_user_phone("alice", "+15551234567").unwrap();
        assert_eq!(
            store.user_phone("alice").unwrap(),
            Some("+15551234567".to_string())
        );
    }

    #[test]
    fn rejects_non_e164() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let err = store.set_user_phone("alice", "555-1234").unwrap_err();
        assert!(matches!(err, CallbellError::InvalidPhone(_)));
        assert_eq!(store.user_phone("alice").unwrap(), None);
    }

    #[test]
    fn users_with_phone_skips_phoneless_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.set_user_phone("bob", "+15550000001").unwrap();
        store.set_user_phone("alice", "+15550000002").unwrap();
        // A profile that exists but has no phone number.
        FileStore::write_toml(&store.user_path("carol"), &UserProfile::default()).unwrap();

        let users = store.users_with_phone().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].user_id, "alice");
        assert_eq!(users[1].user_id, "bob");
    }

    #[test]
    fn empty_store_has_no_users() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.users_with_phone().unwrap().is_empty());
    }
}
