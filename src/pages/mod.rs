//! Page controllers: the state behind each console view and the handlers
//! user actions dispatch to.

pub mod dashboard;
pub mod login;
pub mod public;

pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use public::PublicPage;

use crate::models::ScammerEntry;

/// Resolve a user reference to a record: a 1-based row number in `visible`,
/// a record id, or a Discord ID, tried in that order.
pub fn find_entry<'a>(
    visible: &'a [ScammerEntry],
    all: &'a [ScammerEntry],
    key: &str,
) -> Option<&'a ScammerEntry> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    // Discord IDs are digits too, so only short numbers count as row numbers
    if key.len() < 10 {
        if let Ok(n) = key.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| visible.get(i));
        }
    }

    all.iter()
        .find(|e| e.id == key)
        .or_else(|| all.iter().find(|e| e.discord_id == key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryStatus;
    use crate::test_support::sample_entry;

    #[test]
    fn test_find_entry_by_row_id_or_discord_id() {
        let all = vec![
            sample_entry("e1", "111111111111111111", "NitroKing", EntryStatus::Active),
            sample_entry("e2", "222222222222222222", "giveaway_bot", EntryStatus::Active),
        ];
        let visible = vec![all[1].clone()];

        assert_eq!(find_entry(&visible, &all, "1").map(|e| e.id.as_str()), Some("e2"));
        assert_eq!(find_entry(&visible, &all, "2"), None);
        assert_eq!(find_entry(&visible, &all, "0"), None);
        assert_eq!(find_entry(&visible, &all, "e1").map(|e| e.id.as_str()), Some("e1"));
        assert_eq!(
            find_entry(&visible, &all, "111111111111111111").map(|e| e.id.as_str()),
            Some("e1")
        );
        assert_eq!(find_entry(&visible, &all, " "), None);
    }
}
