use crate::aggregate::{aggregate, EngineConfig};
use crate::index::DocumentIndex;
use crate::types::TagMenuState;
use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type SubscriberId = u64;

type Callback = Rc<dyn Fn(&TagMenuState)>;

struct Inner {
    state: TagMenuState,
    subscribers: Vec<(SubscriberId, Callback)>,
    next_subscriber: SubscriberId,
}

/// Observable navigation store.
///
/// Owns the last computed [`TagMenuState`] and the selection it was built
/// from. Preference changes synchronously rebuild the state for that
/// retained selection; each rebuild replaces the snapshot wholesale, so no
/// partial state is ever observable.
pub struct TagMenuStore {
    inner: Rc<RefCell<Inner>>,
    settings: tagnav_settings::SettingsStore,
    index: Rc<dyn DocumentIndex>,
    config: EngineConfig,
    settings_subscription: Cell<Option<tagnav_settings::SubscriberId>>,
}

impl TagMenuStore {
    /// Build a store over `index`, wired to `settings` so preference
    /// changes re-run the aggregation with the last requested selection.
    pub fn new(
        settings: tagnav_settings::SettingsStore,
        index: Rc<dyn DocumentIndex>,
        config: EngineConfig,
    ) -> Self {
        let inner = Rc::new(RefCell::new(Inner {
            state: TagMenuState::default(),
            subscribers: Vec::new(),
            next_subscriber: 0,
        }));

        let subscription = {
            let inner = Rc::downgrade(&inner);
            let index = index.clone();
            settings.subscribe(move |snapshot| {
                let Some(inner) = inner.upgrade() else {
                    return;
                };
                let selection = inner.borrow().state.selected_tags.clone();
                debug!(
                    "settings changed, recomputing for {} selected tags",
                    selection.len()
                );
                let state = aggregate(&selection, snapshot, index.as_ref(), config);
                apply_state(&inner, state);
            })
        };

        Self {
            inner,
            settings,
            index,
            config,
            settings_subscription: Cell::new(Some(subscription)),
        }
    }

    /// Clone of the current state snapshot.
    pub fn state(&self) -> TagMenuState {
        self.inner.borrow().state.clone()
    }

    /// Register for synchronous snapshot notifications.
    pub fn subscribe(&self, callback: impl Fn(&TagMenuState) + 'static) -> SubscriberId {
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

    /// Recompute the navigation structure for `selection`.
    pub fn select_tags(&self, selection: Vec<String>) {
        let snapshot = self.settings.snapshot();
        let state = aggregate(&selection, &snapshot, self.index.as_ref(), self.config);
        apply_state(&self.inner, state);
    }

    /// Flip `group` in the expanded set without recomputing anything else.
    /// The ungrouped section ("") stays expanded.
    pub fn toggle_expanded_group(&self, group: &str) {
        {
            let mut guard = self.inner.borrow_mut();
            let expanded = &mut guard.state.expanded_groups;
            if let Some(position) = expanded.iter().position(|g| g == group) {
                if !group.is_empty() {
                    expanded.remove(position);
                }
            } else {
                expanded.push(group.to_string());
            }
        }
        dispatch(&self.inner);
    }

    /// Restore a previously persisted view: recompute for the stored
    /// selection, then overlay the stored expanded set.
    pub fn load_state(&self, selected_tags: Vec<String>, expanded_groups: Vec<String>) {
        self.select_tags(selected_tags);
        {
            let mut guard = self.inner.borrow_mut();
            guard.state.expanded_groups = expanded_groups;
            if !guard.state.expanded_groups.iter().any(|group| group.is_empty()) {
                guard.state.expanded_groups.push(String::new());
            }
        }
        dispatch(&self.inner);
    }

    /// Detach from the settings store; preference changes no longer trigger
    /// recomputes. Runs automatically on drop.
    pub fn unsubscribe_from_settings(&self) {
        if let Some(id) = self.settings_subscription.take() {
            self.settings.unsubscribe(id);
        }
    }
}

impl Drop for TagMenuStore {
    fn drop(&mut self) {
        self.unsubscribe_from_settings();
    }
}

fn apply_state(inner: &Rc<RefCell<Inner>>, state: TagMenuState) {
    inner.borrow_mut().state = state;
    dispatch(inner);
}

// Dispatch clones the callback list and releases the borrow first, so a
// subscriber may re-enter the store.
fn dispatch(inner: &Rc<RefCell<Inner>>) {
    let (snapshot, callbacks) = {
        let guard = inner.borrow();
        (
            guard.state.clone(),
            guard
                .subscribers
                .iter()
                .map(|(_, callback)| callback.clone())
                .collect::<Vec<_>>(),
        )
    };
    for callback in callbacks {
        callback(&snapshot);
    }
}
