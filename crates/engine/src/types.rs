use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque handle to a note, as issued by the host's document index.
///
/// The vault-relative path doubles as the identity key; the engine never
/// touches the file behind it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NoteHandle {
    pub path: String,
}

impl NoteHandle {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// A hierarchical child folded under a top-level entry for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubEntry {
    pub display_name: String,
    pub notes: Vec<NoteHandle>,
}

/// One (group, tag) cell of the navigation structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEntry {
    /// Title shown for the tag: the path remainder after the group label.
    pub display_name: String,

    /// Matching notes. After folding, a parent's list also carries its
    /// children's notes, duplicates allowed; this list feeds crossref
    /// counting, not display counts.
    pub notes: Vec<NoteHandle>,

    /// Co-occurrence counts for other tags found on this entry's notes.
    pub crossrefs: BTreeMap<String, u64>,

    /// Hierarchical children folded under this entry.
    pub subrefs: BTreeMap<String, SubEntry>,
}

/// Fully sorted navigation structure, rebuilt from scratch on every
/// selection or preference change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMenuState {
    /// Entries partitioned by group, then keyed by full tag.
    pub to_show: BTreeMap<String, BTreeMap<String, NavigationEntry>>,

    /// Group display order.
    pub groups_sorted: Vec<String>,

    /// Tag display order within each group.
    pub tags_sorted: BTreeMap<String, Vec<String>>,

    /// Crossref display order per (group, tag).
    pub crossrefs_sorted: BTreeMap<String, BTreeMap<String, Vec<String>>>,

    /// Subref display order per (group, tag).
    pub subrefs_sorted: BTreeMap<String, BTreeMap<String, Vec<String>>>,

    /// Every note matching the selection, in index order.
    pub all_matching_notes: Vec<NoteHandle>,

    /// The active AND-filter.
    pub selected_tags: Vec<String>,

    /// Groups currently expanded in the UI. Not derived from the index;
    /// survives expansion toggles and resets on recompute. The ungrouped
    /// section ("") is always present.
    pub expanded_groups: Vec<String>,
}

impl Default for TagMenuState {
    fn default() -> Self {
        Self {
            to_show: BTreeMap::new(),
            groups_sorted: Vec::new(),
            tags_sorted: BTreeMap::new(),
            crossrefs_sorted: BTreeMap::new(),
            subrefs_sorted: BTreeMap::new(),
            all_matching_notes: Vec::new(),
            selected_tags: Vec::new(),
            // The ungrouped section stays expanded.
            expanded_groups: vec![String::new()],
        }
    }
}
