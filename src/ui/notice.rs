use super::Theme;
use crate::form::FormErrors;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

pub fn render_notice(notice: &Notice, theme: Theme) -> String {
    let (tag, message) = match (notice, theme) {
        (Notice::Success(m), Theme::Plain) => ("[ok]", m),
        (Notice::Error(m), Theme::Plain) => ("[error]", m),
        (Notice::Success(m), Theme::Boxed) => ("✔", m),
        (Notice::Error(m), Theme::Boxed) => ("✖", m),
    };
    format!("{} {}", tag, message)
}

/// One line per invalid field
pub fn render_form_errors(errors: &FormErrors, theme: Theme) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("  {} {}: {}", theme.bullet(), field.label(), message))
        .collect::<Vec<_>>()
        .join("\n")
}
