use super::SessionStore;
use crate::domain::wallet::SessionRecord;
use crate::foundation::{AnchorError, Result};
use std::sync::{Mutex, MutexGuard};

/// In-memory store for tests and ephemeral embeddings.
pub struct MemorySessionStore {
    record: Mutex<Option<SessionRecord>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self { record: Mutex::new(None) }
    }

    pub fn with_record(record: SessionRecord) -> Self {
        Self { record: Mutex::new(Some(record)) }
    }

    fn lock_record(&self) -> Result<MutexGuard<'_, Option<SessionRecord>>> {
        self.record
            .lock()
            .map_err(|_| AnchorError::StorageError { operation: "memory session store lock".to_string(), details: "poisoned".to_string() })
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionRecord>> {
        Ok(self.lock_record()?.clone())
    }

    fn save(&self, record: &SessionRecord) -> Result<()> {
        *self.lock_record()? = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock_record()? = None;
        Ok(())
    }
}
