mod error;
mod persist;
mod store;

pub use error::{Result, SettingsError};
pub use persist::{JsonFileSettings, MemorySettings, SettingsPersistence};
pub use store::{SettingsStore, StoredSettings, SubscriberId};
