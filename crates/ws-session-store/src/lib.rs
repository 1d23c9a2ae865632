use anyhow::{Result, anyhow};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, warn};
use ws_api_types::WalletSession;

#[cfg(feature = "rocksdb")]
use rocksdb::{DB, Options};
#[cfg(feature = "rocksdb")]
use std::path::Path;

/// Key of the single durable slot inside a backing key-value store.
pub const SESSION_SLOT_KEY: &str = "wallet-session:current";

/// One named, durable location holding a serialized wallet session.
///
/// Implementations must make `write` atomic: a concurrent or subsequent
/// `read` sees either the previous value or the new one, never a mix.
pub trait DurableSlot {
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, value: &str) -> Result<()>;
    fn remove(&self) -> Result<()>;
}

/// In-memory slot. Clones share the same value.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(value.into()))),
        }
    }

    pub fn snapshot(&self) -> Option<String> {
        self.value.lock().ok().and_then(|guard| guard.clone())
    }
}

impl DurableSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>> {
        let guard = self
            .value
            .lock()
            .map_err(|_| anyhow!("memory slot lock poisoned"))?;
        Ok(guard.clone())
    }

    fn write(&self, value: &str) -> Result<()> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| anyhow!("memory slot lock poisoned"))?;
        *guard = Some(value.to_owned());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| anyhow!("memory slot lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// Slot stored under [`SESSION_SLOT_KEY`] in a RocksDB database.
///
/// One database path is one profile.
#[cfg(feature = "rocksdb")]
pub struct RocksDbSlot {
    db: Arc<DB>,
}

#[cfg(feature = "rocksdb")]
impl RocksDbSlot {
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self> {
        let mut options = Options::default();
        options.create_if_missing(true);
        let db = DB::open(&options, path)?;
        Ok(Self { db: Arc::new(db) })
    }
}

#[cfg(feature = "rocksdb")]
impl DurableSlot for RocksDbSlot {
    fn read(&self) -> Result<Option<String>> {
        let Some(raw) = self.db.get(SESSION_SLOT_KEY.as_bytes())? else {
            return Ok(None);
        };
        let value = String::from_utf8(raw)
            .map_err(|err| anyhow!("session slot is not valid UTF-8: {err}"))?;
        Ok(Some(value))
    }

    fn write(&self, value: &str) -> Result<()> {
        self.db.put(SESSION_SLOT_KEY.as_bytes(), value.as_bytes())?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        self.db.delete(SESSION_SLOT_KEY.as_bytes())?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("session slot could not be read: {0}")]
    Unreadable(anyhow::Error),
    #[error("session slot holds a corrupted value: {0}")]
    Corrupted(serde_json::Error),
}

/// Durable mirror of the current wallet session.
///
/// Shape-checks whatever the slot holds on the way out; a value that is not a
/// complete [`WalletSession`] is reported as absent.
pub struct SessionStore<D> {
    slot: D,
}

impl<D> SessionStore<D>
where
    D: DurableSlot,
{
    pub fn new(slot: D) -> Self {
        Self { slot }
    }

    pub fn try_load(&self) -> Result<Option<WalletSession>, LoadError> {
        let Some(raw) = self.slot.read().map_err(LoadError::Unreadable)? else {
            return Ok(None);
        };

        serde_json::from_str::<WalletSession>(&raw)
            .map(Some)
            .map_err(LoadError::Corrupted)
    }

    pub fn load(&self) -> Option<WalletSession> {
        match self.try_load() {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "ignoring stored wallet session");
                None
            }
        }
    }

    pub fn save(&self, session: &WalletSession) -> Result<()> {
        let value = serde_json::to_string(session)?;
        self.slot.write(&value)?;
        debug!(address = session.address(), "wallet session saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.slot.remove()?;
        debug!("wallet session cleared");
        Ok(())
    }
}
