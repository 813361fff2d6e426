use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::Mutex;
use crate::domain::Session;
use super::SessionError;

/// Where the session actor mirrors its state.
///
/// Every save overwrites the whole document; there is no partial update.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn load(&self) -> Result<Option<Session>, SessionError>;
    async fn save(&self, session: &Session) -> Result<(), SessionError>;
    async fn clear(&self) -> Result<(), SessionError>;
}

/// JSON file holding `{"user": ..., "token": ...}`.
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn storage_error(context: &str, error: impl std::fmt::Display) -> SessionError {
    SessionError::Storage(format!("{context}: {error}"))
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> Result<Option<Session>, SessionError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error("read failed", e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| storage_error("invalid session document", e))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error("create dir failed", e))?;
        }
        let body = serde_json::to_vec_pretty(session).map_err(|e| storage_error("encode failed", e))?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| storage_error("write failed", e))
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove failed", e)),
        }
    }
}

/// In-process storage. Clones share the same slot.
#[derive(Clone, Default)]
pub struct MemorySessionStorage {
    slot: Arc<Mutex<Option<Session>>>,
}

impl MemorySessionStorage {
    pub fn with_session(session: Session) -> Self {
        Self { slot: Arc::new(Mutex::new(Some(session))) }
    }

    pub async fn snapshot(&self) -> Option<Session> {
        self.slot.lock().await.clone()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.snapshot().await)
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.slot.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.slot.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::User;

    #[tokio::test]
    async fn test_file_storage_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path().join("nested").join("session.json"));
        assert_eq!(storage.load().await.unwrap(), None);

        let session = Session::new(User::new("u1", "Asha", "asha@example.com"), "tok");
        storage.save(&session).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some(session));

        storage.clear().await.unwrap();
        storage.clear().await.unwrap();
        assert_eq!(storage.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_storage_keeps_storage_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let storage = FileSessionStorage::new(&path);
        storage
            .save(&Session::new(User::new("u1", "Asha", "asha@example.com"), "tok"))
            .await
            .unwrap();

        let raw: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["token"], "tok");
        assert_eq!(raw["user"]["user_id"], "u1");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"{not json").unwrap();

        let result = FileSessionStorage::new(&path).load().await;
        assert!(matches!(result, Err(SessionError::Storage(_))));
    }
}
