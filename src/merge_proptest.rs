//! Property-based tests for entry list merging.
//!
//! Projects are used as the entry type: their identity is the name, which
//! keeps generated inputs easy to reason about.

#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;

    use crate::merge::{merge_entries, Identified};
    use crate::schema::{GitSource, Project, ProjectSource};
    use proptest::prelude::*;

    fn project(name: String, location: String) -> Project {
        Project::new(
            name,
            ProjectSource::Git(GitSource {
                location,
                branch: String::new(),
            }),
        )
    }

    /// Projects with distinct names.
    fn unique_projects(max: usize) -> impl Strategy<Value = Vec<Project>> {
        prop::collection::btree_map("[a-e]{1,2}", "[a-z]{1,6}", 0..max).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(name, location)| project(name, location))
                .collect()
        })
    }

    fn names(projects: &[Project]) -> Vec<String> {
        projects.iter().map(|p| p.name.clone()).collect()
    }

    proptest! {
        /// Property: merging a list with itself yields the list unchanged
        #[test]
        fn merge_with_itself_is_identity(base in unique_projects(8)) {
            prop_assert_eq!(merge_entries(&base, &base), base);
        }

        /// Property: merging an empty child yields the parent list
        #[test]
        fn empty_child_keeps_parent(base in unique_projects(8)) {
            prop_assert_eq!(merge_entries(&base, &[]), base);
        }

        /// Property: parent entries keep their relative order and positions
        #[test]
        fn parent_positions_are_preserved(
            base in unique_projects(8),
            overrides in unique_projects(8),
        ) {
            let merged = merge_entries(&base, &overrides);
            prop_assert!(merged.len() >= base.len());
            prop_assert_eq!(names(&merged[..base.len()]), names(&base));
        }

        /// Property: every child entry ends up in the result verbatim
        #[test]
        fn child_entries_win(
            base in unique_projects(8),
            overrides in unique_projects(8),
        ) {
            let merged = merge_entries(&base, &overrides);
            for entry in &overrides {
                prop_assert!(merged.contains(entry));
            }
        }

        /// Property: the result has one entry per distinct identity
        #[test]
        fn identities_are_unique(
            base in unique_projects(8),
            overrides in unique_projects(8),
        ) {
            let merged = merge_entries(&base, &overrides);
            let ids: HashSet<_> = merged.iter().filter_map(|p| p.identity()).collect();
            prop_assert_eq!(ids.len(), merged.len());

            let expected: HashSet<_> = base
                .iter()
                .chain(overrides.iter())
                .filter_map(|p| p.identity())
                .collect();
            prop_assert_eq!(ids, expected);
        }

        /// Property: new child entries are appended in child order
        #[test]
        fn new_entries_are_appended_in_order(
            base in unique_projects(8),
            overrides in unique_projects(8),
        ) {
            let merged = merge_entries(&base, &overrides);
            let base_names: HashSet<_> = names(&base).into_iter().collect();
            let appended: Vec<String> = names(&overrides)
                .into_iter()
                .filter(|name| !base_names.contains(name))
                .collect();
            prop_assert_eq!(names(&merged[base.len()..]), appended);
        }
    }
}
