use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::page_range::parse_page_range;

/// Opaque identifier for a group within one [`GroupSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(u64);

/// A named page selection: display name plus an unparsed range expression.
#[derive(Debug, Clone)]
pub struct SplitGroup {
    pub id: GroupId,
    pub name: String,
    pub range: String,
}

/// The `{name, range}` wire shape shared by `--groups-file` input and
/// `suggest` output. AI-suggested groups enter through the same path as
/// user-entered ones and get no special trust.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    pub range: String,
}

/// Ordered collection of groups with collection-locally unique ids.
///
/// All edits consume the set and return a new one; nothing is mutated in
/// place, so a set can be handed to validation or planning at any point
/// without defensive copies.
#[derive(Debug, Clone, Default)]
pub struct GroupSet {
    groups: Vec<SplitGroup>,
    next_id: u64,
}

impl GroupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from wire-shape specs, assigning ids in order.
    pub fn from_specs<I>(specs: I) -> Self
    where
        I: IntoIterator<Item = GroupSpec>,
    {
        specs
            .into_iter()
            .fold(Self::new(), |set, spec| set.add(spec.name, spec.range))
    }

    /// Append a group, assigning it the next id.
    pub fn add(mut self, name: impl Into<String>, range: impl Into<String>) -> Self {
        let id = GroupId(self.next_id);
        self.next_id += 1;
        self.groups.push(SplitGroup {
            id,
            name: name.into(),
            range: range.into(),
        });
        self
    }

    /// Drop the group with the given id; unknown ids are a no-op.
    pub fn remove(mut self, id: GroupId) -> Self {
        self.groups.retain(|g| g.id != id);
        self
    }

    /// Replace the display name of the group with the given id.
    #[allow(dead_code)]
    pub fn rename(mut self, id: GroupId, name: impl Into<String>) -> Self {
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == id) {
            group.name = name.into();
        }
        self
    }

    /// Replace the range expression of the group with the given id.
    #[allow(dead_code)]
    pub fn set_range(mut self, id: GroupId, range: impl Into<String>) -> Self {
        if let Some(group) = self.groups.iter_mut().find(|g| g.id == id) {
            group.range = range.into();
        }
        self
    }

    pub fn groups(&self) -> &[SplitGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Outcome of cross-group overlap validation. `overlapping_pages` is 1-based
/// and ascending, matching how pages are shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlapping_pages: Option<Vec<u32>>,
}

impl ValidationResult {
    fn ok() -> Self {
        ValidationResult {
            valid: true,
            error: None,
            overlapping_pages: None,
        }
    }

    fn parse_failure(message: String) -> Self {
        ValidationResult {
            valid: false,
            error: Some(message),
            overlapping_pages: None,
        }
    }
}

/// Check that no page is claimed by more than one group.
///
/// Stops at the first range that fails to parse, reporting that error
/// verbatim. Otherwise every page referenced by two or more groups is
/// reported, in one aggregated message. Callers that allow overlaps skip
/// this entirely.
pub fn validate_groups(groups: &[SplitGroup], total_pages: u32) -> ValidationResult {
    let mut claims: BTreeMap<u32, u32> = BTreeMap::new();

    for group in groups {
        match parse_page_range(&group.range, total_pages) {
            Ok(indices) => {
                for index in indices {
                    *claims.entry(index).or_insert(0) += 1;
                }
            }
            Err(e) => return ValidationResult::parse_failure(e.to_string()),
        }
    }

    let overlaps: Vec<u32> = claims
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(index, _)| index + 1)
        .collect();

    if overlaps.is_empty() {
        return ValidationResult::ok();
    }

    let listed = overlaps
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    ValidationResult {
        valid: false,
        error: Some(format!("Overlapping pages detected: {listed}")),
        overlapping_pages: Some(overlaps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(specs: &[(&str, &str)]) -> GroupSet {
        GroupSet::from_specs(specs.iter().map(|(name, range)| GroupSpec {
            name: name.to_string(),
            range: range.to_string(),
        }))
    }

    #[test]
    fn test_add_preserves_order_and_assigns_unique_ids() {
        let set = set_of(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let names: Vec<_> = set.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);

        let mut ids: Vec<_> = set.groups().iter().map(|g| g.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let set = set_of(&[("a", "1"), ("b", "2")]);
        let removed = set.groups()[1].id;
        let set = set.remove(removed).add("c", "3");

        assert_eq!(set.len(), 2);
        assert!(set.groups().iter().all(|g| g.id != removed));
    }

    #[test]
    fn test_rename_and_set_range_touch_only_the_target() {
        let set = set_of(&[("a", "1"), ("b", "2")]);
        let target = set.groups()[0].id;
        let set = set.rename(target, "front").set_range(target, "1-2");

        assert_eq!(set.groups()[0].name, "front");
        assert_eq!(set.groups()[0].range, "1-2");
        assert_eq!(set.groups()[1].name, "b");
        assert_eq!(set.groups()[1].range, "2");
    }

    #[test]
    fn test_overlap_detected() {
        let set = set_of(&[("a", "1-3"), ("b", "3-5")]);
        let result = validate_groups(set.groups(), 5);

        assert!(!result.valid);
        assert_eq!(result.overlapping_pages, Some(vec![3]));
        assert_eq!(
            result.error.as_deref(),
            Some("Overlapping pages detected: 3")
        );
    }

    #[test]
    fn test_disjoint_groups_are_valid() {
        let set = set_of(&[("a", "1-3"), ("b", "4-5")]);
        let result = validate_groups(set.groups(), 5);

        assert!(result.valid);
        assert!(result.error.is_none());
        assert!(result.overlapping_pages.is_none());
    }

    #[test]
    fn test_multiple_overlaps_reported_ascending() {
        let set = set_of(&[("a", "1-4"), ("b", "3-6"), ("c", "4")]);
        let result = validate_groups(set.groups(), 10);

        assert_eq!(result.overlapping_pages, Some(vec![3, 4]));
        assert_eq!(
            result.error.as_deref(),
            Some("Overlapping pages detected: 3, 4")
        );
    }

    #[test]
    fn test_parse_failure_short_circuits_verbatim() {
        let set = set_of(&[("a", "1-3"), ("b", "nope"), ("c", "9-2")]);
        let result = validate_groups(set.groups(), 10);

        assert!(!result.valid);
        // The first failing group's message, not the later inverted range.
        assert_eq!(
            result.error.as_deref(),
            Some("invalid page number: \"nope\"")
        );
        assert!(result.overlapping_pages.is_none());
    }

    #[test]
    fn test_empty_ranges_do_not_overlap() {
        let set = set_of(&[("a", ""), ("b", "")]);
        assert!(validate_groups(set.groups(), 5).valid);
    }
}
