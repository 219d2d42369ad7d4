use super::{format_date, pad, status_label, truncate, width, Theme};
use crate::models::ScammerEntry;

const NAME_MAX: usize = 24;

/// Registry table. Rows are numbered from 1 so the shell can refer to them.
pub fn render_table(entries: &[ScammerEntry], theme: Theme) -> String {
    let title = format!("Registry ({} records)", entries.len());
    if entries.is_empty() {
        return format!("{}\n\nNo records found.", title);
    }

    let headers = ["#", "Discord ID", "Name", "Method", "Status", "Added"];
    let rows: Vec<Vec<String>> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            vec![
                (i + 1).to_string(),
                e.discord_id.clone(),
                truncate(&e.discord_name, NAME_MAX),
                e.scam_method.display_name().to_string(),
                status_label(e.status).to_string(),
                format_date(&e.created_at),
            ]
        })
        .collect();

    format!("{}\n\n{}", title, grid(theme, &headers, &rows))
}

fn grid(theme: Theme, headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, h)| {
            rows.iter()
                .filter_map(|r| r.get(col))
                .map(|c| width(c))
                .chain(std::iter::once(width(h)))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let rule_cells = |w: &usize| -> String { std::iter::repeat(theme.horizontal()).take(*w).collect() };
    let rules: Vec<String> = widths.iter().map(rule_cells).collect();
    let (left, right) = theme.row_edges();
    let row_line = |cells: Vec<String>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(c, *w))
            .collect();
        format!("{}{}{}", left, padded.join(theme.separator()), right)
    };

    let mut lines = Vec::with_capacity(rows.len() + 4);
    if let Some([top_left, top_right, _, _]) = theme.frame() {
        lines.push(format!("{}{}{}", top_left, rules.join(theme.frame_join(true)), top_right));
    }
    lines.push(row_line(headers.iter().map(|h| h.to_string()).collect()));

    let (rule_left, rule_right) = theme.rule_edges();
    lines.push(format!("{}{}{}", rule_left, rules.join(theme.rule_separator()), rule_right));

    for row in rows {
        lines.push(row_line(row.clone()));
    }
    if let Some([_, _, bottom_left, bottom_right]) = theme.frame() {
        lines.push(format!("{}{}{}", bottom_left, rules.join(theme.frame_join(false)), bottom_right));
    }

    lines
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
