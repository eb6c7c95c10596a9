use crate::types::NoteHandle;

/// Read-only view of the host application's note index.
///
/// `tags_of` must be stable for the duration of one aggregation pass; the
/// engine fetches each note's tags exactly once per pass.
pub trait DocumentIndex {
    fn notes(&self) -> Vec<NoteHandle>;
    fn tags_of(&self, note: &NoteHandle) -> Vec<String>;
}

/// Fixed in-memory index, for tests and hosts that precompute tag sets.
#[derive(Debug, Clone, Default)]
pub struct StaticIndex {
    entries: Vec<(NoteHandle, Vec<String>)>,
}

impl StaticIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, note: impl Into<String>, tags: &[&str]) {
        self.entries.push((
            NoteHandle::new(note),
            tags.iter().map(|tag| (*tag).to_string()).collect(),
        ));
    }
}

impl DocumentIndex for StaticIndex {
    fn notes(&self) -> Vec<NoteHandle> {
        self.entries.iter().map(|(note, _)| note.clone()).collect()
    }

    fn tags_of(&self, note: &NoteHandle) -> Vec<String> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == note)
            .map(|(_, tags)| tags.clone())
            .unwrap_or_default()
    }
}
