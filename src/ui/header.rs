use super::{panel, Theme};
use crate::models::Statistics;

/// Page header with the three registry counters. Counters read zero until
/// statistics have been loaded.
pub fn render_header(title: &str, subtitle: &str, stats: Option<&Statistics>, theme: Theme) -> String {
    let stats = stats.copied().unwrap_or_default();
    let lines = vec![
        subtitle.to_string(),
        String::new(),
        format!(
            "{} Total records: {}   {} Active threats: {}   {} Verified: {}",
            theme.bullet(),
            stats.total_records,
            theme.bullet(),
            stats.active_threats,
            theme.bullet(),
            stats.verified
        ),
    ];
    panel(theme, title, &lines)
}

/// Placeholder shown while the session check is outstanding
pub fn render_loading(message: &str) -> String {
    format!("… {}", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_counts() {
        let stats = Statistics {
            total_records: 12,
            active_threats: 7,
            verified: 12,
        };
        let out = render_header("Scammer Registry", "Known scammers", Some(&stats), Theme::Plain);
        assert!(out.starts_with("Scammer Registry\n----------------\nKnown scammers"));
        assert!(out.contains("* Total records: 12"));
        assert!(out.contains("* Active threats: 7"));
        assert!(out.contains("* Verified: 12"));
    }

    #[test]
    fn test_header_without_stats_shows_zero() {
        let out = render_header("Registry", "", None, Theme::Boxed);
        assert!(out.contains("• Total records: 0"));
    }
}
