//! Text renderers for the console views.
//!
//! Every renderer is a pure function of its data and a `Theme`; there is a
//! single code path per component regardless of the look.

mod detail;
mod header;
mod notice;
mod table;
mod theme;

pub use detail::render_detail;
pub use header::{render_header, render_loading};
pub use notice::{render_form_errors, render_notice, Notice};
pub use table::render_table;
pub use theme::Theme;

use chrono::{DateTime, Utc};

use crate::models::EntryStatus;

/// `dd.mm.yyyy`, the date format the registry has always used
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%d.%m.%Y").to_string()
}

pub fn status_label(status: EntryStatus) -> &'static str {
    match status {
        EntryStatus::Active => "Active",
        EntryStatus::Inactive => "Inactive",
    }
}

/// Width in terminal columns, counting each char as one column
fn width(s: &str) -> usize {
    s.chars().count()
}

fn pad(s: &str, to: usize) -> String {
    let mut out = s.to_string();
    out.extend(std::iter::repeat(' ').take(to.saturating_sub(width(s))));
    out
}

/// Cut `s` to at most `max` columns, marking the cut with an ellipsis
fn truncate(s: &str, max: usize) -> String {
    if width(s) <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Frame `lines` under `title`. Plain panels underline the title instead.
fn panel(theme: Theme, title: &str, lines: &[String]) -> String {
    let inner = lines
        .iter()
        .map(|l| width(l))
        .chain(std::iter::once(width(title)))
        .max()
        .unwrap_or(0);
    let rule: String = std::iter::repeat(theme.horizontal()).take(inner).collect();

    let mut out = Vec::with_capacity(lines.len() + 4);
    match theme.frame() {
        Some([top_left, top_right, bottom_left, bottom_right]) => {
            let (left, right) = theme.row_edges();
            let (rule_left, rule_right) = theme.rule_edges();
            out.push(format!("{}{}{}", top_left, rule, top_right));
            out.push(format!("{}{}{}", left, pad(title, inner), right));
            out.push(format!("{}{}{}", rule_left, rule, rule_right));
            for line in lines {
                out.push(format!("{}{}{}", left, pad(line, inner), right));
            }
            out.push(format!("{}{}{}", bottom_left, rule, bottom_right));
        }
        None => {
            out.push(title.to_string());
            let underline: String = std::iter::repeat(theme.horizontal()).take(width(title)).collect();
            out.push(underline);
            out.extend(lines.iter().map(|l| l.trim_end().to_string()));
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2025, 3, 4, 23, 59, 0).unwrap();
        assert_eq!(format_date(&date), "04.03.2025");
    }

    #[test]
    fn test_panel_frames_every_line_to_same_width() {
        let lines = vec!["short".to_string(), "a longer line".to_string()];
        let boxed = panel(Theme::Boxed, "Title", &lines);
        let widths: Vec<usize> = boxed.lines().map(width).collect();
        assert!(widths.iter().all(|w| *w == widths[0]), "{}", boxed);
        assert!(boxed.starts_with("┌─"));

        let plain = panel(Theme::Plain, "Title", &lines);
        assert_eq!(plain, "Title\n-----\nshort\na longer line");
    }

    #[test]
    fn test_pad_and_truncate_count_chars() {
        assert_eq!(pad("Фишинг", 8), "Фишинг  ");
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
