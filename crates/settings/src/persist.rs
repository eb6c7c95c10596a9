use crate::error::{Result, SettingsError};
use crate::store::StoredSettings;
use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

/// Contract for the external blob store holding user preferences.
///
/// `read` returning `Ok(None)` means nothing has been persisted yet and the
/// caller falls back to built-in defaults. Write failures surface to the
/// caller but never roll back in-memory state.
pub trait SettingsPersistence {
    fn read(&self) -> Result<Option<StoredSettings>>;
    fn write(&self, settings: &StoredSettings) -> Result<()>;
}

/// Preferences persisted as a JSON blob on disk.
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl SettingsPersistence for JsonFileSettings {
    fn read(&self) -> Result<Option<StoredSettings>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        let settings = serde_json::from_str(&raw)?;
        Ok(Some(settings))
    }

    fn write(&self, settings: &StoredSettings) -> Result<()> {
        let raw = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// In-memory persistence for tests and hosts that manage their own blob.
#[derive(Default)]
pub struct MemorySettings {
    blob: RefCell<Option<StoredSettings>>,
    fail_writes: Cell<bool>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(settings: StoredSettings) -> Self {
        Self {
            blob: RefCell::new(Some(settings)),
            fail_writes: Cell::new(false),
        }
    }

    /// Make every subsequent `write` fail, to exercise best-effort paths.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// The last successfully written blob, if any.
    pub fn stored(&self) -> Option<StoredSettings> {
        self.blob.borrow().clone()
    }
}

impl SettingsPersistence for MemorySettings {
    fn read(&self) -> Result<Option<StoredSettings>> {
        Ok(self.blob.borrow().clone())
    }

    fn write(&self, settings: &StoredSettings) -> Result<()> {
        if self.fail_writes.get() {
            return Err(SettingsError::Persistence(
                "memory store rejected write".to_string(),
            ));
        }
        *self.blob.borrow_mut() = Some(settings.clone());
        Ok(())
    }
}
