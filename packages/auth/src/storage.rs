//! Session persistence backends.
//!
//! The GoTrue client keeps the last issued session here so a reload restores it.
//! Native builds use a JSON file, the browser uses `localStorage`, tests use memory.

use std::sync::{Mutex, PoisonError};

use crate::error::AuthError;
use crate::models::Session;

/// Key (browser) or file stem (native) the session is stored under.
pub const STORAGE_KEY: &str = "databank.auth.session";

pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<Session>, AuthError>;
    fn save(&self, session: &Session) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

fn decode(raw: &str) -> Result<Session, AuthError> {
    serde_json::from_str(raw).map_err(|e| AuthError::Decode(format!("stored session: {e}")))
}

fn encode(session: &Session) -> Result<String, AuthError> {
    serde_json::to_string(session).map_err(|e| AuthError::Storage(e.to_string()))
}

/// Process-local storage; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, session: &Session) -> Result<(), AuthError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileSessionStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{decode, encode, SessionStorage};
    use crate::error::AuthError;
    use crate::models::Session;

    /// JSON file on disk.
    #[derive(Clone, Debug)]
    pub struct FileSessionStorage {
        path: PathBuf,
    }

    impl FileSessionStorage {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// `<dir>/databank.auth.session.json`
        pub fn in_dir(dir: impl AsRef<Path>) -> Self {
            Self::new(dir.as_ref().join(format!("{}.json", super::STORAGE_KEY)))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl SessionStorage for FileSessionStorage {
        fn load(&self) -> Result<Option<Session>, AuthError> {
            match std::fs::read_to_string(&self.path) {
                Ok(raw) => decode(&raw).map(Some),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(AuthError::Storage(format!(
                    "reading {}: {e}",
                    self.path.display()
                ))),
            }
        }

        fn save(&self, session: &Session) -> Result<(), AuthError> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| AuthError::Storage(format!("creating {}: {e}", parent.display())))?;
            }
            std::fs::write(&self.path, encode(session)?)
                .map_err(|e| AuthError::Storage(format!("writing {}: {e}", self.path.display())))
        }

        fn clear(&self) -> Result<(), AuthError> {
            match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(AuthError::Storage(format!(
                    "removing {}: {e}",
                    self.path.display()
                ))),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalSessionStorage;

#[cfg(target_arch = "wasm32")]
mod local {
    use super::{decode, encode, SessionStorage, STORAGE_KEY};
    use crate::error::AuthError;
    use crate::models::Session;

    /// Browser `localStorage`, one JSON value under [`STORAGE_KEY`].
    #[derive(Clone, Copy, Debug, Default)]
    pub struct LocalSessionStorage;

    fn storage() -> Result<web_sys::Storage, AuthError> {
        web_sys::window()
            .ok_or_else(|| AuthError::Storage("no window".to_string()))?
            .local_storage()
            .map_err(|e| AuthError::Storage(format!("{e:?}")))?
            .ok_or_else(|| AuthError::Storage("localStorage unavailable".to_string()))
    }

    impl SessionStorage for LocalSessionStorage {
        fn load(&self) -> Result<Option<Session>, AuthError> {
            let raw = storage()?
                .get_item(STORAGE_KEY)
                .map_err(|e| AuthError::Storage(format!("{e:?}")))?;
            raw.as_deref().map(decode).transpose()
        }

        fn save(&self, session: &Session) -> Result<(), AuthError> {
            storage()?
                .set_item(STORAGE_KEY, &encode(session)?)
                .map_err(|e| AuthError::Storage(format!("{e:?}")))
        }

        fn clear(&self) -> Result<(), AuthError> {
            storage()?
                .remove_item(STORAGE_KEY)
                .map_err(|e| AuthError::Storage(format!("{e:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{User, UserMetadata};

    fn session() -> Session {
        Session {
            access_token: "a".to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            expires_at: Some(10),
            refresh_token: "r".to_string(),
            user: User {
                id: "u1".to_string(),
                email: Some("user@example.com".to_string()),
                user_metadata: UserMetadata::default(),
            },
        }
    }

    #[test]
    fn memory_storage_keeps_last_session() {
        let storage = MemorySessionStorage::new();
        assert!(storage.load().unwrap().is_none());
        storage.save(&session()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(session()));
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn file_storage_survives_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::in_dir(dir.path().join("nested"));
        assert!(storage.load().unwrap().is_none());

        storage.save(&session()).unwrap();
        let reopened = FileSessionStorage::new(storage.path());
        assert_eq!(reopened.load().unwrap(), Some(session()));

        reopened.clear().unwrap();
        reopened.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn file_storage_reports_corrupt_data() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::in_dir(dir.path());
        std::fs::write(storage.path(), "{not json").unwrap();
        assert!(matches!(storage.load(), Err(AuthError::Decode(_))));
    }
}
