use crate::error::{Result, SettingsError};
use crate::persist::SettingsPersistence;
use log::warn;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

fn default_favorite_groups() -> Vec<String> {
    vec!["status".to_string(), "activity".to_string()]
}

/// Durable user preferences for the tag browser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredSettings {
    /// Group names pinned to the front of the group ordering.
    #[serde(default = "default_favorite_groups")]
    pub favorite_groups: Vec<String>,

    /// Tags promoted into the synthetic "favorite tags" group.
    #[serde(default)]
    pub favorite_tags: Vec<String>,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            favorite_groups: default_favorite_groups(),
            favorite_tags: Vec::new(),
        }
    }
}

pub type SubscriberId = u64;

type Callback = Rc<dyn Fn(&StoredSettings)>;

struct Inner {
    settings: StoredSettings,
    subscribers: Vec<(SubscriberId, Callback)>,
    next_subscriber: SubscriberId,
}

/// Observable preference store.
///
/// Mutations go through the toggle operations, which persist the full
/// settings object afterward and notify subscribers synchronously with the
/// new snapshot. Persistence is best-effort: a failed write leaves the
/// in-memory state updated and surfaces as [`SettingsError::Persistence`].
#[derive(Clone)]
pub struct SettingsStore {
    inner: Rc<RefCell<Inner>>,
    persistence: Rc<dyn SettingsPersistence>,
}

impl SettingsStore {
    /// Read persisted preferences, falling back to built-in defaults when
    /// the blob is missing. Partially missing fields default per-field.
    pub fn load(persistence: Rc<dyn SettingsPersistence>) -> Result<Self> {
        let settings = persistence.read()?.unwrap_or_default();
        Ok(Self {
            inner: Rc::new(RefCell::new(Inner {
                settings,
                subscribers: Vec::new(),
                next_subscriber: 0,
            })),
            persistence,
        })
    }

    /// Current immutable snapshot.
    pub fn snapshot(&self) -> StoredSettings {
        self.inner.borrow().settings.clone()
    }

    /// Register for synchronous change notifications. The callback receives
    /// the new snapshot after every mutation and may re-enter the store.
    pub fn subscribe(&self, callback: impl Fn(&StoredSettings) + 'static) -> SubscriberId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_subscriber;
        inner.next_subscriber += 1;
        inner.subscribers.push((id, Rc::new(callback)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.inner
            .borrow_mut()
            .subscribers
            .retain(|(sid, _)| *sid != id);
    }

    /// Append `group` to the favorites if absent, remove it otherwise.
    pub fn toggle_favorite_group(&self, group: &str) -> Result<()> {
        self.mutate(|settings| toggle_entry(&mut settings.favorite_groups, group))
    }

    /// Symmetric to [`Self::toggle_favorite_group`], for favorite tags.
    pub fn toggle_favorite_tag(&self, tag: &str) -> Result<()> {
        self.mutate(|settings| toggle_entry(&mut settings.favorite_tags, tag))
    }

    fn mutate(&self, apply: impl FnOnce(&mut StoredSettings)) -> Result<()> {
        let snapshot = {
            let mut inner = self.inner.borrow_mut();
            apply(&mut inner.settings);
            inner.settings.clone()
        };

        let persisted = self.persistence.write(&snapshot).map_err(|e| match e {
            SettingsError::Persistence(_) => e,
            other => SettingsError::Persistence(other.to_string()),
        });
        if let Err(err) = &persisted {
            warn!("settings write failed, keeping in-memory state: {err}");
        }

        self.notify(&snapshot);
        persisted
    }

    fn notify(&self, snapshot: &StoredSettings) {
        // Snapshot the callback list so a subscriber can re-enter the store.
        let callbacks: Vec<Callback> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in callbacks {
            callback(snapshot);
        }
    }
}

fn toggle_entry(entries: &mut Vec<String>, value: &str) {
    if let Some(index) = entries.iter().position(|entry| entry == value) {
        entries.remove(index);
    } else {
        entries.push(value.to_string());
    }
}
