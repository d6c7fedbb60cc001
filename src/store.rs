//! Durable progress storage.
//!
//! Implementations only move one opaque string in and out; encoding, decoding
//! and corrupt-record recovery live in the provided trait methods so every
//! backend behaves the same way.

use log::{debug, warn};
use thiserror::Error;

use crate::progress::ProgressState;

/// Fixed key of the single progress record.
pub const STORAGE_KEY: &str = "speakeasy_pro_v1";

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("stored progress is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("could not encode progress: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("write failed: {0}")]
    Write(String),
}

/// Decode a stored record. Out-of-range values are repaired, not rejected.
///
/// # Errors
///
/// Returns `StoreError::Corrupt` if `raw` is not a progress record.
pub fn decode(raw: &str) -> Result<ProgressState, StoreError> {
    let state: ProgressState = serde_json::from_str(raw).map_err(StoreError::Corrupt)?;
    Ok(state.sanitized())
}

/// Encode a state in its storage form. The state is written in its
/// [`ProgressState::sanitized`] form, so `decode(encode(s)) == s.sanitized()`
/// and a valid state comes back unchanged.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if serialization fails (not expected
/// for well-formed states).
pub fn encode(state: &ProgressState) -> Result<String, StoreError> {
    serde_json::to_string(&state.clone().sanitized()).map_err(StoreError::Serialization)
}

/// A place to keep the one progress record.
pub trait ProgressStore {
    /// Raw stored record, `None` if nothing was saved yet.
    fn read(&self) -> Result<Option<String>, StoreError>;
    /// Overwrite the stored record.
    fn write(&mut self, raw: &str) -> Result<(), StoreError>;
    /// Delete the stored record. Deleting nothing is not an error.
    fn remove(&mut self) -> Result<(), StoreError>;

    /// Stored progress, or a fresh state when there is none.
    ///
    /// A record that fails to parse is logged, deleted and replaced by a fresh
    /// state; an unreadable backend also yields a fresh state.
    fn load(&mut self) -> ProgressState {
        let raw = match self.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return ProgressState::default(),
            Err(err) => {
                warn!("progress store unreadable, starting fresh: {err}");
                return ProgressState::default();
            }
        };
        match decode(&raw) {
            Ok(state) => {
                debug!(
                    "loaded progress: cursor {}, {} attempts",
                    state.current_level,
                    state.attempts.len()
                );
                state
            }
            Err(err) => {
                warn!("{err}; discarding record");
                if let Err(err) = self.remove() {
                    warn!("could not discard corrupt record: {err}");
                }
                ProgressState::default()
            }
        }
    }

    /// Persist the whole state, replacing the previous record.
    fn save(&mut self, state: &ProgressState) -> Result<(), StoreError> {
        let raw = encode(state)?;
        self.write(&raw)
    }

    /// Forget all progress.
    fn clear(&mut self) -> Result<(), StoreError> {
        self.remove()
    }
}

impl<P: ProgressStore + ?Sized> ProgressStore for Box<P> {
    fn read(&self) -> Result<Option<String>, StoreError> {
        (**self).read()
    }

    fn write(&mut self, raw: &str) -> Result<(), StoreError> {
        (**self).write(raw)
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        (**self).remove()
    }
}

/// In-memory store for tests and native embedding.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    raw: Option<String>,
    fail_writes: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw record (possibly malformed).
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            fail_writes: false,
        }
    }

    /// Make every subsequent write fail, as a full quota would.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl ProgressStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.raw.clone())
    }

    fn write(&mut self, raw: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write("memory store is read-only".into()));
        }
        self.raw = Some(raw.to_owned());
        Ok(())
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        self.raw = None;
        Ok(())
    }
}

/// Browser `localStorage` backend, one record per profile.
pub struct LocalStorageStore {
    storage: web_sys::Storage,
    key: String,
}

impl LocalStorageStore {
    /// Open `window.localStorage` under [`STORAGE_KEY`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` outside a browser window or when
    /// storage is disabled for the page.
    pub fn open() -> Result<Self, StoreError> {
        Self::open_with_key(STORAGE_KEY)
    }

    /// Open `window.localStorage` under a custom key.
    ///
    /// # Errors
    ///
    /// See [`LocalStorageStore::open`].
    pub fn open_with_key(key: &str) -> Result<Self, StoreError> {
        let window =
            web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".into()))?;
        Ok(Self {
            storage,
            key: key.to_owned(),
        })
    }
}

impl ProgressStore for LocalStorageStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(&self.key)
            .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
    }

    fn write(&mut self, raw: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(&self.key, raw)
            .map_err(|e| StoreError::Write(format!("{e:?}")))
    }

    fn remove(&mut self) -> Result<(), StoreError> {
        self.storage
            .remove_item(&self.key)
            .map_err(|e| StoreError::Write(format!("{e:?}")))
    }
}
