//! Persistence of the managed state document.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::config::{validate_state, AppState};
use crate::error::{Result, StateError};

/// Loads and saves [`AppState`].
pub trait StateStore: Send {
    /// Load the saved state, or `None` if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if saved state exists but is unreadable or invalid.
    fn load(&self) -> Result<Option<AppState>>;

    /// Replace the saved state.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be written.
    fn save(&self, state: &AppState) -> Result<()>;
}

/// Pretty-printed JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    /// Store state at `path`.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// The state file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> Result<Option<AppState>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(StateError::from)?;
        let state: AppState =
            serde_json::from_str(&content).map_err(|source| StateError::Malformed {
                path: self.path.display().to_string(),
                source,
            })?;
        validate_state(&state)?;

        debug!(state_file = %self.path.display(), "loaded state");
        Ok(Some(state))
    }

    fn save(&self, state: &AppState) -> Result<()> {
        if !self.path.exists() {
            info!(state_file = %self.path.display(), "state file does not exist, creating");
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(StateError::from)?;
            }
        }

        let json = serde_json::to_string_pretty(state).map_err(StateError::from)?;
        let tmp = self.temp_path();
        fs::write(&tmp, json).map_err(StateError::from)?;
        fs::rename(&tmp, &self.path).map_err(StateError::from)?;

        debug!(
            state_file = %self.path.display(),
            locations = ?state.locations.names().collect::<Vec<_>>(),
            "saved state"
        );
        Ok(())
    }
}

/// In-memory store.
///
/// Clones share the same slot, so a test can keep a handle and inspect what
/// was saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    state: Option<AppState>,
    saves: usize,
}

impl MemoryStateStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `state`.
    pub fn with_state(state: AppState) -> Self {
        let store = Self::new();
        store.slot().state = Some(state);
        store
    }

    /// Last saved (or seeded) state.
    pub fn saved(&self) -> Option<AppState> {
        self.slot().state.clone()
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.slot().saves
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, MemorySlot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<AppState>> {
        self.slot().state.clone().map(|s| validate_state(&s).map(|_| s)).transpose()
    }

    fn save(&self, state: &AppState) -> Result<()> {
        let mut slot = self.slot();
        slot.state = Some(state.clone());
        slot.saves += 1;
        Ok(())
    }
}
