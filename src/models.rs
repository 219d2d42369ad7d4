// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a flagged identity operated. Serialized with the labels the API stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScamMethod {
    #[serde(rename = "Фишинг")]
    Phishing,
    #[serde(rename = "Вымогательство")]
    Extortion,
    #[serde(rename = "Мошенничество с криптой")]
    CryptoScam,
    #[serde(rename = "Поддельные раздачи")]
    FakeGiveaway,
    #[serde(rename = "Продажа несуществующих услуг")]
    FakeServices,
    #[serde(rename = "Другое")]
    Other,
}

impl ScamMethod {
    pub const ALL: [ScamMethod; 6] = [
        ScamMethod::Phishing,
        ScamMethod::Extortion,
        ScamMethod::CryptoScam,
        ScamMethod::FakeGiveaway,
        ScamMethod::FakeServices,
        ScamMethod::Other,
    ];

    /// Label used on the wire and in the API's database
    pub fn wire_label(&self) -> &'static str {
        match self {
            ScamMethod::Phishing => "Фишинг",
            ScamMethod::Extortion => "Вымогательство",
            ScamMethod::CryptoScam => "Мошенничество с криптой",
            ScamMethod::FakeGiveaway => "Поддельные раздачи",
            ScamMethod::FakeServices => "Продажа несуществующих услуг",
            ScamMethod::Other => "Другое",
        }
    }

    /// Human-readable name shown in tables
    pub fn display_name(&self) -> &'static str {
        match self {
            ScamMethod::Phishing => "Phishing",
            ScamMethod::Extortion => "Extortion",
            ScamMethod::CryptoScam => "Crypto scam",
            ScamMethod::FakeGiveaway => "Fake giveaway",
            ScamMethod::FakeServices => "Fake services",
            ScamMethod::Other => "Other",
        }
    }

    /// Short keyword accepted on the command line
    pub fn keyword(&self) -> &'static str {
        match self {
            ScamMethod::Phishing => "phishing",
            ScamMethod::Extortion => "extortion",
            ScamMethod::CryptoScam => "crypto",
            ScamMethod::FakeGiveaway => "giveaway",
            ScamMethod::FakeServices => "fake-services",
            ScamMethod::Other => "other",
        }
    }
}

impl fmt::Display for ScamMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_label())
    }
}

impl FromStr for ScamMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        ScamMethod::ALL
            .iter()
            .copied()
            .find(|m| m.keyword().eq_ignore_ascii_case(input) || m.wire_label() == input)
            .ok_or_else(|| {
                let keywords: Vec<&str> = ScamMethod::ALL.iter().map(|m| m.keyword()).collect();
                format!("unknown scam method '{}' (expected one of: {})", input, keywords.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Active,
    Inactive,
}

impl EntryStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EntryStatus::Active => "active",
            EntryStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(EntryStatus::Active),
            "inactive" => Ok(EntryStatus::Inactive),
            other => Err(format!("unknown status '{}' (expected active or inactive)", other)),
        }
    }
}

/// A registry record as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScammerEntry {
    pub id: String,
    pub discord_id: String,
    pub discord_name: String,
    pub scam_method: ScamMethod,
    pub description: String,
    #[serde(default)]
    pub status: EntryStatus,
    #[serde(with = "api_time")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", with = "api_time")]
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/scammers`. New records always start out active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub discord_id: String,
    pub discord_name: String,
    pub scam_method: ScamMethod,
    pub description: String,
}

/// Body of `PUT /api/scammers/{id}`; unset fields are left untouched by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discord_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scam_method: Option<ScamMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EntryStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    #[serde(default)]
    pub total_records: u64,
    #[serde(default)]
    pub active_threats: u64,
    #[serde(default)]
    pub verified: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Admin,
}

/// Timestamps as the API writes them. Stored times are UTC but usually
/// carry no offset (`2025-01-15T10:30:00.123456`); RFC 3339 is accepted too.
mod api_time {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub(super) fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
        if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
            return Ok(time.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(|e| format!("invalid timestamp '{}': {}", raw, e))
    }
}

/// Profile returned by `/api/auth/me` and `/api/auth/register`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(with = "api_time")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of debug logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of `POST /api/auth/login`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Error body the API sends alongside non-2xx statuses
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// Flatten `detail`, which is a string for handled errors and a list for
    /// request validation failures.
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }
}

/// Body of a successful `DELETE /api/scammers/{id}`
#[derive(Debug, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Paging parameters shared by the list endpoints. Searching happens on the
/// loaded page, so the server-side `search` parameter is never sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub skip: u32,
    pub limit: u32,
}

impl ListQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self { skip: 0, limit }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::with_limit(100)
    }
}
