use crate::index::DocumentIndex;
use crate::types::{NavigationEntry, NoteHandle, SubEntry, TagMenuState};
use log::debug;
use std::collections::{BTreeMap, HashMap};
use tagnav_settings::StoredSettings;
use tagnav_tag_path::{root_tag, tag_parts_at};

/// Name of the synthetic group holding promoted favorite tags.
pub const FAVORITE_TAGS_GROUP: &str = "favorite tags";

/// Aggregation tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Number of leading path segments forming a tag's group key.
    pub grouping_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { grouping_depth: 1 }
    }
}

/// Rebuild the full navigation structure for `selection`.
///
/// Pure with respect to its inputs: the same selection, settings, and index
/// contents always produce an identical state. Runs six passes in order:
/// candidate scan, hierarchy folding, group ordering, tag ordering, crossref
/// counting, crossref/subref ordering.
pub fn aggregate(
    selection: &[String],
    settings: &StoredSettings,
    index: &dyn DocumentIndex,
    config: EngineConfig,
) -> TagMenuState {
    let mut state = TagMenuState::default();
    state.selected_tags = selection.to_vec();

    let mut group_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut tag_counts: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();

    // Candidate pass. Tags are fetched once per note; the cache also feeds
    // the crossref scan below.
    let notes = index.notes();
    let mut note_tags: HashMap<NoteHandle, Vec<String>> = HashMap::with_capacity(notes.len());

    for note in &notes {
        let tags = index.tags_of(note);

        if selection.iter().all(|selected| tags.contains(selected)) {
            state.all_matching_notes.push(note.clone());

            for tag in &tags {
                if selection.contains(tag) {
                    continue;
                }

                let parts = tag_parts_at(tag, config.grouping_depth);
                let group = parts.label.unwrap_or_default();

                let entry = state
                    .to_show
                    .entry(group.clone())
                    .or_default()
                    .entry(tag.clone())
                    .or_insert_with(|| NavigationEntry {
                        display_name: parts.title,
                        ..NavigationEntry::default()
                    });
                entry.notes.push(note.clone());

                *group_counts.entry(group.clone()).or_insert(0) += 1;
                *tag_counts
                    .entry(group)
                    .or_default()
                    .entry(tag.clone())
                    .or_insert(0) += 1;
            }
        }

        note_tags.insert(note.clone(), tags);
    }

    // Hierarchy folding. A tag deeper than the grouping scheme moves under
    // its depth-(grouping_depth + 1) ancestor when that ancestor is itself a
    // displayed tag in the same group. Receivers keep their own key (their
    // root is themselves), so one pass over the pre-fold keys folds exactly
    // one level and never cascades.
    let parent_depth = config.grouping_depth + 1;
    let prefold: Vec<(String, Vec<String>)> = state
        .to_show
        .iter()
        .map(|(group, tags)| (group.clone(), tags.keys().cloned().collect()))
        .collect();

    for (group, tags) in prefold {
        for tag in tags {
            let parent = root_tag(&tag, parent_depth);
            if parent == tag {
                continue;
            }

            let Some(group_map) = state.to_show.get_mut(&group) else {
                continue;
            };
            if !group_map.contains_key(&parent) {
                continue;
            }

            let Some(child) = group_map.remove(&tag) else {
                continue;
            };
            let Some(parent_entry) = group_map.get_mut(&parent) else {
                continue;
            };

            // The merged note list may repeat a note carrying both tags;
            // crossref counting wants that, display counts never read it.
            parent_entry.notes.extend(child.notes.iter().cloned());
            parent_entry.subrefs.insert(
                tag,
                SubEntry {
                    display_name: child.display_name,
                    notes: child.notes,
                },
            );
        }
    }

    // Group ordering. Distinct tag count joins the hit tally so groups with
    // more columns rank ahead on equal hits.
    let group_score = |group: &str| -> u64 {
        group_counts.get(group).copied().unwrap_or(0)
            + tag_counts
                .get(group)
                .map(|tags| tags.len() as u64)
                .unwrap_or(0)
    };

    let mut groups: Vec<String> = state.to_show.keys().cloned().collect();
    groups.sort_by(|a, b| group_score(b).cmp(&group_score(a)).then_with(|| a.cmp(b)));

    // Favorites are pulled to the front lowest-score-first, leaving the
    // highest-scoring favorite nearest the front.
    let mut favorite_groups = settings.favorite_groups.clone();
    favorite_groups.sort_by(|a, b| group_score(a).cmp(&group_score(b)).then_with(|| a.cmp(b)));
    for favorite in &favorite_groups {
        if let Some(position) = groups.iter().position(|group| group == favorite) {
            let group = groups.remove(position);
            groups.insert(0, group);
        }
    }

    // The ungrouped bucket always lands last.
    if let Some(position) = groups.iter().position(|group| group.is_empty()) {
        let group = groups.remove(position);
        groups.push(group);
    }

    // Favorite tags with a matching ungrouped entry move into a synthetic
    // group at the very front.
    let matching_favorites: Vec<String> = state
        .to_show
        .get("")
        .map(|ungrouped| {
            settings
                .favorite_tags
                .iter()
                .filter(|tag| ungrouped.contains_key(*tag))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    if !matching_favorites.is_empty() {
        groups.insert(0, FAVORITE_TAGS_GROUP.to_string());

        let mut promoted: BTreeMap<String, NavigationEntry> = BTreeMap::new();
        let mut promoted_counts: BTreeMap<String, u64> = BTreeMap::new();
        if let Some(ungrouped) = state.to_show.get_mut("") {
            for tag in &matching_favorites {
                if let Some(entry) = ungrouped.remove(tag) {
                    promoted.insert(tag.clone(), entry);
                }
            }
        }
        if let Some(counts) = tag_counts.get_mut("") {
            for tag in &matching_favorites {
                if let Some(count) = counts.remove(tag) {
                    promoted_counts.insert(tag.clone(), count);
                }
            }
        }
        state.to_show.insert(FAVORITE_TAGS_GROUP.to_string(), promoted);
        tag_counts.insert(FAVORITE_TAGS_GROUP.to_string(), promoted_counts);
    }

    state.groups_sorted = groups;

    // Tag ordering inside each group uses the pre-fold direct-match tallies.
    for (group, tags) in &state.to_show {
        let counts = tag_counts.get(group);
        let mut sorted: Vec<String> = tags.keys().cloned().collect();
        sorted.sort_by(|a, b| {
            let count_a = counts.and_then(|c| c.get(a)).copied().unwrap_or(0);
            let count_b = counts.and_then(|c| c.get(b)).copied().unwrap_or(0);
            count_b.cmp(&count_a).then_with(|| a.cmp(b))
        });
        state.tags_sorted.insert(group.clone(), sorted);
    }

    // Crossref counting scans each entry's note list, children included for
    // folded parents, so a parent's map carries its own and its children's
    // co-occurrences summed.
    for tags in state.to_show.values_mut() {
        for (tag, entry) in tags.iter_mut() {
            let mut crossrefs: BTreeMap<String, u64> = BTreeMap::new();
            for note in &entry.notes {
                let Some(tags_on_note) = note_tags.get(note) else {
                    continue;
                };
                for other in tags_on_note {
                    if other == tag || selection.contains(other) {
                        continue;
                    }
                    *crossrefs.entry(other.clone()).or_insert(0) += 1;
                }
            }
            entry.crossrefs = crossrefs;
        }
    }

    // Crossref and subref ordering: descending count, favorites promoted to
    // the front with their relative order preserved.
    let favorite_prefixes: Vec<String> = settings
        .favorite_groups
        .iter()
        .map(|group| format!("#{group}"))
        .collect();
    let is_favorite = |tag: &str| -> bool {
        settings.favorite_tags.iter().any(|favorite| favorite == tag)
            || favorite_prefixes
                .iter()
                .any(|prefix| tag.starts_with(prefix.as_str()))
    };

    for (group, tags) in &state.to_show {
        let mut group_crossrefs: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut group_subrefs: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for (tag, entry) in tags {
            let mut crossrefs: Vec<(String, u64)> = entry
                .crossrefs
                .iter()
                .map(|(other, count)| (other.clone(), *count))
                .collect();
            crossrefs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            group_crossrefs.insert(tag.clone(), promote_favorites(crossrefs, &is_favorite));

            let mut subrefs: Vec<(String, u64)> = entry
                .subrefs
                .iter()
                .map(|(child, sub)| (child.clone(), sub.notes.len() as u64))
                .collect();
            subrefs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            group_subrefs.insert(tag.clone(), promote_favorites(subrefs, &is_favorite));
        }

        state.crossrefs_sorted.insert(group.clone(), group_crossrefs);
        state.subrefs_sorted.insert(group.clone(), group_subrefs);
    }

    debug!(
        "aggregate: {} selected, {} of {} notes matched, {} groups",
        selection.len(),
        state.all_matching_notes.len(),
        notes.len(),
        state.groups_sorted.len()
    );

    state
}

/// Move favorites ahead of non-favorites; both sides keep their
/// descending-count order.
fn promote_favorites<F>(sorted: Vec<(String, u64)>, is_favorite: &F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let (favorites, rest): (Vec<_>, Vec<_>) = sorted
        .into_iter()
        .partition(|(tag, _)| is_favorite(tag));
    favorites
        .into_iter()
        .chain(rest)
        .map(|(tag, _)| tag)
        .collect()
}
