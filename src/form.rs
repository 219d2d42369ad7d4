//! Entry form: transient field values plus per-field validation errors.

use std::collections::BTreeMap;
use std::fmt;

use crate::models::{EntryStatus, EntryUpdate, NewEntry, ScamMethod, ScammerEntry};

pub const DISCORD_ID_LEN: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    DiscordId,
    DiscordName,
    ScamMethod,
    Description,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::DiscordId => "Discord ID",
            Field::DiscordName => "Discord name",
            Field::ScamMethod => "Scam method",
            Field::Description => "Description",
        }
    }
}

/// Field-level validation messages, ordered by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<Field, String>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_string());
    }

    fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field.label(), message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// `true` when `value` is exactly eighteen ASCII digits
pub fn is_valid_discord_id(value: &str) -> bool {
    value.len() == DISCORD_ID_LEN && value.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryForm {
    mode: FormMode,
    pub discord_id: String,
    pub discord_name: String,
    pub scam_method: Option<ScamMethod>,
    pub description: String,
    status: EntryStatus,
    errors: FormErrors,
}

impl EntryForm {
    /// Empty form for a new record; status is fixed to active
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            discord_id: String::new(),
            discord_name: String::new(),
            scam_method: None,
            description: String::new(),
            status: EntryStatus::Active,
            errors: FormErrors::default(),
        }
    }

    /// Form pre-filled from an existing record
    pub fn edit(entry: &ScammerEntry) -> Self {
        Self {
            mode: FormMode::Edit {
                id: entry.id.clone(),
            },
            discord_id: entry.discord_id.clone(),
            discord_name: entry.discord_name.clone(),
            scam_method: Some(entry.scam_method),
            description: entry.description.clone(),
            status: entry.status,
            errors: FormErrors::default(),
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn status(&self) -> EntryStatus {
        self.status
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn set_discord_id(&mut self, value: impl Into<String>) {
        self.discord_id = value.into();
        self.errors.remove(Field::DiscordId);
    }

    pub fn set_discord_name(&mut self, value: impl Into<String>) {
        self.discord_name = value.into();
        self.errors.remove(Field::DiscordName);
    }

    pub fn set_scam_method(&mut self, value: ScamMethod) {
        self.scam_method = Some(value);
        self.errors.remove(Field::ScamMethod);
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
        self.errors.remove(Field::Description);
    }

    /// Status can only change on an existing record. Returns whether the
    /// value was accepted.
    pub fn set_status(&mut self, value: EntryStatus) -> bool {
        if !self.is_edit() {
            return false;
        }
        self.status = value;
        true
    }

    /// Validate every field, replacing the stored errors. Returns `true` when
    /// the form may be submitted.
    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::default();

        if self.discord_id.trim().is_empty() {
            errors.insert(Field::DiscordId, "Discord ID is required");
        } else if !is_valid_discord_id(&self.discord_id) {
            errors.insert(Field::DiscordId, "Discord ID must be exactly 18 digits");
        }

        if self.discord_name.trim().is_empty() {
            errors.insert(Field::DiscordName, "Discord name is required");
        }

        if self.scam_method.is_none() {
            errors.insert(Field::ScamMethod, "Choose a scam method");
        }

        if self.description.trim().is_empty() {
            errors.insert(Field::Description, "Description is required");
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Payload for `POST /api/scammers`
    pub fn to_new_entry(&mut self) -> Result<NewEntry, FormErrors> {
        let scam_method = self.checked_method()?;
        Ok(NewEntry {
            discord_id: self.discord_id.clone(),
            discord_name: self.discord_name.trim().to_string(),
            scam_method,
            description: self.description.trim().to_string(),
        })
    }

    /// Payload for `PUT /api/scammers/{id}`; includes the status
    pub fn to_update(&mut self) -> Result<EntryUpdate, FormErrors> {
        let scam_method = self.checked_method()?;
        Ok(EntryUpdate {
            discord_id: Some(self.discord_id.clone()),
            discord_name: Some(self.discord_name.trim().to_string()),
            scam_method: Some(scam_method),
            description: Some(self.description.trim().to_string()),
            status: Some(self.status),
        })
    }

    fn checked_method(&mut self) -> Result<ScamMethod, FormErrors> {
        if !self.validate() {
            return Err(self.errors.clone());
        }
        self.scam_method.ok_or_else(|| self.errors.clone())
    }
}
