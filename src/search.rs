//! Client-side filtering of the loaded result set

use crate::models::ScammerEntry;

/// Entries whose Discord ID or name contains `term`, ignoring case.
/// A blank term keeps everything.
pub fn filter_entries(entries: &[ScammerEntry], term: &str) -> Vec<ScammerEntry> {
    if term.trim().is_empty() {
        return entries.to_vec();
    }

    let needle = term.to_lowercase();
    entries
        .iter()
        .filter(|entry| matches_term(entry, &needle))
        .cloned()
        .collect()
}

fn matches_term(entry: &ScammerEntry, needle: &str) -> bool {
    entry.discord_id.to_lowercase().contains(needle)
        || entry.discord_name.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryStatus;
    use crate::test_support::sample_entry;

    fn entries() -> Vec<ScammerEntry> {
        vec![
            sample_entry("e1", "111111111111111111", "NitroKing", EntryStatus::Active),
            sample_entry("e2", "222222222222222222", "giveaway_bot", EntryStatus::Active),
            sample_entry("e3", "333333333333333333", "OldTrader", EntryStatus::Inactive),
            sample_entry("e4", "123123123123123123", "Кирилл", EntryStatus::Active),
        ]
    }

    fn ids(entries: &[ScammerEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_blank_term_returns_everything() {
        let all = entries();
        assert_eq!(filter_entries(&all, ""), all);
        assert_eq!(filter_entries(&all, "   \t"), all);
    }

    #[test]
    fn test_matches_name_case_insensitively() {
        let all = entries();
        assert_eq!(ids(&filter_entries(&all, "nitro")), vec!["e1"]);
        assert_eq!(ids(&filter_entries(&all, "TRADER")), vec!["e3"]);
        assert_eq!(ids(&filter_entries(&all, "кирилл")), vec!["e4"]);
    }

    #[test]
    fn test_matches_discord_id_substring() {
        let all = entries();
        assert_eq!(ids(&filter_entries(&all, "2222")), vec!["e2"]);
        assert_eq!(ids(&filter_entries(&all, "123")), vec!["e4"]);
    }

    #[test]
    fn test_result_is_exact_subset() {
        let all = entries();
        for term in ["1", "o", "bot", "zzz"] {
            let filtered = filter_entries(&all, term);
            let expected: Vec<ScammerEntry> = all
                .iter()
                .filter(|e| {
                    e.discord_id.to_lowercase().contains(term)
                        || e.discord_name.to_lowercase().contains(term)
                })
                .cloned()
                .collect();
            assert_eq!(filtered, expected, "term {:?}", term);
        }
    }
}
