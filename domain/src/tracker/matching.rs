//! Name lookup for find-then-act tools.

/// Anything with a human-facing name (sprints, boards, spaces)
pub trait Named {
    fn name(&self) -> &str;
}

/// Check two names for a case-insensitive exact match
pub fn names_match(candidate: &str, wanted: &str) -> bool {
    candidate.to_lowercase() == wanted.to_lowercase()
}

/// First item whose name matches `wanted` case-insensitively.
///
/// No fuzzy or substring matching, no disambiguation between several hits.
pub fn find_by_name<'a, T: Named>(items: &'a [T], wanted: &str) -> Option<&'a T> {
    items.iter().find(|item| names_match(item.name(), wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sprint {
        id: u64,
        name: &'static str,
    }

    impl Named for Sprint {
        fn name(&self) -> &str {
            self.name
        }
    }

    fn sprints() -> Vec<Sprint> {
        vec![
            Sprint { id: 1, name: "Sprint 1" },
            Sprint { id: 2, name: "Sprint 12" },
            Sprint { id: 3, name: "sprint 12" },
        ]
    }

    #[test]
    fn test_case_only_difference_matches() {
        let items = sprints();
        assert_eq!(find_by_name(&items, "SPRINT 1").unwrap().id, 1);
    }

    #[test]
    fn test_substring_does_not_match() {
        let items = sprints();
        assert!(find_by_name(&items, "Sprint").is_none());
        assert!(find_by_name(&items, "Sprint 1 ").is_none());
        assert_eq!(find_by_name(&items, "sprint 1").unwrap().id, 1);
    }

    #[test]
    fn test_first_match_wins() {
        let items = sprints();
        assert_eq!(find_by_name(&items, "SPRINT 12").unwrap().id, 2);
    }
}
