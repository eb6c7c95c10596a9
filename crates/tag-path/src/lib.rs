/// A tag split into its display parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagParts {
    /// The tag exactly as passed in, leading `#` and all.
    pub tag: String,
    /// Group label: the leading path segments, without `#`. `None` for
    /// single-segment tags.
    pub label: Option<String>,
    /// Display title: the segments after the label.
    pub title: String,
}

/// Split `tag` into a group label and display title.
///
/// The nesting level defaults to 1; when `parent_tag` is given it is the
/// parent's `/`-segment count, so children render relative to their parent.
pub fn tag_parts(tag: &str, parent_tag: Option<&str>) -> TagParts {
    let nesting_level = parent_tag
        .map(|parent| parent.split('/').count())
        .unwrap_or(1);
    tag_parts_at(tag, nesting_level)
}

/// Split `tag` at an explicit nesting level.
///
/// A malformed tag (for example empty after stripping `#`) degrades to a
/// single-segment tag with itself as the title; neither variant can fail.
pub fn tag_parts_at(tag: &str, nesting_level: usize) -> TagParts {
    let stripped = tag.strip_prefix('#').unwrap_or(tag);

    if stripped.contains('/') {
        let segments: Vec<&str> = stripped.split('/').collect();
        let cut = nesting_level.min(segments.len());
        TagParts {
            tag: tag.to_string(),
            label: Some(segments[..cut].join("/")),
            title: segments[cut..].join("/"),
        }
    } else {
        TagParts {
            tag: tag.to_string(),
            label: None,
            title: stripped.to_string(),
        }
    }
}

/// First `depth` `/`-separated segments of `tag`, joined back with `/`.
///
/// Operates on the raw string: a leading `#` stays on the first segment, so
/// the result compares equal to map keys that carry it.
pub fn root_tag(tag: &str, depth: usize) -> String {
    tag.split('/').take(depth).collect::<Vec<_>>().join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_label_and_title_at_default_level() {
        let parts = tag_parts("#area/project/sub", None);
        assert_eq!(parts.tag, "#area/project/sub");
        assert_eq!(parts.label.as_deref(), Some("area"));
        assert_eq!(parts.title, "project/sub");
    }

    #[test]
    fn single_segment_has_no_label() {
        let parts = tag_parts("#inbox", None);
        assert_eq!(parts.label, None);
        assert_eq!(parts.title, "inbox");
        assert_eq!(parts.tag, "#inbox");
    }

    #[test]
    fn hash_prefix_is_optional() {
        let with_hash = tag_parts("#status/done", None);
        let without = tag_parts("status/done", None);
        assert_eq!(with_hash.label, without.label);
        assert_eq!(with_hash.title, without.title);
        assert_eq!(without.tag, "status/done");
    }

    #[test]
    fn parent_tag_controls_nesting_level() {
        let parts = tag_parts("#area/project/sub", Some("#area/project"));
        assert_eq!(parts.label.as_deref(), Some("area/project"));
        assert_eq!(parts.title, "sub");
    }

    #[test]
    fn nesting_level_beyond_depth_consumes_everything() {
        let parts = tag_parts_at("#a/b", 5);
        assert_eq!(parts.label.as_deref(), Some("a/b"));
        assert_eq!(parts.title, "");
    }

    #[test]
    fn empty_and_bare_hash_degrade_to_single_segment() {
        let empty = tag_parts("", None);
        assert_eq!(empty.label, None);
        assert_eq!(empty.title, "");

        let bare = tag_parts("#", None);
        assert_eq!(bare.label, None);
        assert_eq!(bare.title, "");
        assert_eq!(bare.tag, "#");
    }

    #[test]
    fn root_tag_keeps_hash_on_first_segment() {
        assert_eq!(root_tag("#area/project/sub", 2), "#area/project");
        assert_eq!(root_tag("#area/project", 2), "#area/project");
        assert_eq!(root_tag("#area", 2), "#area");
    }

    #[test]
    fn root_tag_depth_one_is_first_segment() {
        assert_eq!(root_tag("status/done", 1), "status");
        assert_eq!(root_tag("", 1), "");
    }
}
