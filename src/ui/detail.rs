use super::{format_date, panel, status_label, Theme};
use crate::models::ScammerEntry;

pub fn render_detail(entry: &ScammerEntry, theme: Theme) -> String {
    let mut lines = vec![
        format!("Discord ID:   {}", entry.discord_id),
        format!("Discord name: {}", entry.discord_name),
        format!(
            "Scam method:  {} ({})",
            entry.scam_method.display_name(),
            entry.scam_method.wire_label()
        ),
        format!("Status:       {}", status_label(entry.status)),
        format!("Added:        {}", format_date(&entry.created_at)),
    ];
    if entry.updated_at != entry.created_at {
        lines.push(format!("Updated:      {}", format_date(&entry.updated_at)));
    }
    lines.push(format!("Record ID:    {}", entry.id));
    lines.push(String::new());
    lines.push("Description:".to_string());
    lines.extend(entry.description.lines().map(|l| format!("  {}", l)));

    panel(theme, "Record details", &lines)
}
