use super::SessionStore;
use crate::domain::wallet::SessionRecord;
use crate::foundation::constants::SESSION_FILE_NAME;
use crate::foundation::{AnchorError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores the session record as a JSON file under `data_dir`.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self { path: data_dir.join(SESSION_FILE_NAME) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionRecord>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(AnchorError::StorageError { operation: "read session record".to_string(), details: err.to_string() })
            }
        };
        let record = serde_json::from_str(&contents)?;
        Ok(Some(record))
    }

    fn save(&self, record: &SessionRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| AnchorError::StorageError {
                operation: "create session store dir".to_string(),
                details: err.to_string(),
            })?;
        }
        let bytes = serde_json::to_vec_pretty(record)?;
        std::fs::write(&self.path, bytes)
            .map_err(|err| AnchorError::StorageError { operation: "write session record".to_string(), details: err.to_string() })
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(AnchorError::StorageError { operation: "clear session record".to_string(), details: err.to_string() })
            }
        }
    }
}
