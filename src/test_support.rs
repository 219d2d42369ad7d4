//! In-memory registry used by the unit tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::collections::HashMap;

use crate::api::RegistryApi;
use crate::error::{ConsoleError, Result};
use crate::models::{
    Credentials, EntryStatus, EntryUpdate, ListQuery, NewEntry, ScamMethod, ScammerEntry,
    Statistics, TokenResponse, UserProfile,
};

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse";

#[derive(Default)]
struct Inner {
    users: HashMap<String, String>,
    entries: Vec<ScammerEntry>,
    calls: HashMap<&'static str, usize>,
    tokens_revoked: bool,
    offline: bool,
    next_id: u32,
}

pub struct FakeRegistry {
    inner: Mutex<Inner>,
}

pub fn sample_entry(id: &str, discord_id: &str, name: &str, status: EntryStatus) -> ScammerEntry {
    let created = Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap();
    ScammerEntry {
        id: id.to_string(),
        discord_id: discord_id.to_string(),
        discord_name: name.to_string(),
        scam_method: ScamMethod::Phishing,
        description: format!("{} sent a fake nitro link", name),
        status,
        created_at: created,
        updated_at: created,
    }
}

impl FakeRegistry {
    pub fn new() -> Self {
        let mut inner = Inner::default();
        inner
            .users
            .insert(ADMIN_USER.to_string(), ADMIN_PASSWORD.to_string());
        inner.entries = vec![
            sample_entry("e1", "111111111111111111", "NitroKing", EntryStatus::Active),
            sample_entry("e2", "222222222222222222", "giveaway_bot", EntryStatus::Active),
            sample_entry("e3", "333333333333333333", "OldTrader", EntryStatus::Inactive),
        ];
        inner.next_id = 4;
        Self {
            inner: Mutex::new(inner),
        }
    }

    pub fn valid_token(&self) -> String {
        format!("token-{}", ADMIN_USER)
    }

    /// Every token issued so far stops being accepted
    pub fn revoke_tokens(&self) {
        self.inner.lock().tokens_revoked = true;
    }

    pub fn set_offline(&self, offline: bool) {
        self.inner.lock().offline = offline;
    }

    pub fn calls(&self, name: &str) -> usize {
        self.inner.lock().calls.get(name).copied().unwrap_or(0)
    }

    pub fn entry_count(&self) -> usize {
        self.inner.lock().entries.len()
    }

    fn record(&self, name: &'static str) -> Result<()> {
        let mut inner = self.inner.lock();
        *inner.calls.entry(name).or_insert(0) += 1;
        if inner.offline {
            return Err(ConsoleError::Api {
                status: StatusCode::BAD_GATEWAY,
                detail: String::new(),
            });
        }
        Ok(())
    }

    fn authorize(&self, token: &str) -> Result<()> {
        let inner = self.inner.lock();
        let known = token
            .strip_prefix("token-")
            .map(|user| inner.users.contains_key(user))
            .unwrap_or(false);
        if inner.tokens_revoked || !known {
            return Err(ConsoleError::Unauthorized);
        }
        Ok(())
    }

    fn profile(username: &str) -> UserProfile {
        UserProfile {
            id: format!("user-{}", username),
            username: username.to_string(),
            role: Default::default(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            is_active: true,
        }
    }
}

fn bad_request(detail: &str) -> ConsoleError {
    ConsoleError::Api {
        status: StatusCode::BAD_REQUEST,
        detail: detail.to_string(),
    }
}

fn not_found() -> ConsoleError {
    ConsoleError::Api {
        status: StatusCode::NOT_FOUND,
        detail: "Record not found".to_string(),
    }
}

fn page_of(entries: &[ScammerEntry], query: &ListQuery) -> Vec<ScammerEntry> {
    entries
        .iter()
        .skip(query.skip as usize)
        .take(query.limit as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl RegistryApi for FakeRegistry {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        self.record("login")?;
        let inner = self.inner.lock();
        match inner.users.get(&credentials.username) {
            Some(password) if *password == credentials.password => Ok(TokenResponse {
                access_token: format!("token-{}", credentials.username),
                token_type: "bearer".to_string(),
            }),
            _ => Err(ConsoleError::Api {
                status: StatusCode::UNAUTHORIZED,
                detail: "Incorrect username or password".to_string(),
            }),
        }
    }

    async fn register(&self, credentials: &Credentials) -> Result<UserProfile> {
        self.record("register")?;
        let mut inner = self.inner.lock();
        if inner.users.contains_key(&credentials.username) {
            return Err(bad_request("Username already registered"));
        }
        inner
            .users
            .insert(credentials.username.clone(), credentials.password.clone());
        Ok(Self::profile(&credentials.username))
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile> {
        self.record("me")?;
        self.authorize(token)?;
        let user = token.trim_start_matches("token-");
        Ok(Self::profile(user))
    }

    async fn list_public(&self, query: &ListQuery) -> Result<Vec<ScammerEntry>> {
        self.record("list_public")?;
        Ok(page_of(&self.inner.lock().entries, query))
    }

    async fn list(&self, token: &str, query: &ListQuery) -> Result<Vec<ScammerEntry>> {
        self.record("list")?;
        self.authorize(token)?;
        Ok(page_of(&self.inner.lock().entries, query))
    }

    async fn get(&self, token: &str, id: &str) -> Result<ScammerEntry> {
        self.record("get")?;
        self.authorize(token)?;
        let inner = self.inner.lock();
        inner
            .entries
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create(&self, token: &str, entry: &NewEntry) -> Result<ScammerEntry> {
        self.record("create")?;
        self.authorize(token)?;
        let mut inner = self.inner.lock();
        if inner.entries.iter().any(|e| e.discord_id == entry.discord_id) {
            return Err(bad_request("A record with this Discord ID already exists"));
        }
        let id = format!("e{}", inner.next_id);
        inner.next_id += 1;
        let now = Utc::now();
        let created = ScammerEntry {
            id,
            discord_id: entry.discord_id.clone(),
            discord_name: entry.discord_name.clone(),
            scam_method: entry.scam_method,
            description: entry.description.clone(),
            status: EntryStatus::Active,
            created_at: now,
            updated_at: now,
        };
        inner.entries.push(created.clone());
        Ok(created)
    }

    async fn update(&self, token: &str, id: &str, update: &EntryUpdate) -> Result<ScammerEntry> {
        self.record("update")?;
        self.authorize(token)?;
        let mut inner = self.inner.lock();
        let entry = inner
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(not_found)?;
        if let Some(v) = &update.discord_id {
            entry.discord_id = v.clone();
        }
        if let Some(v) = &update.discord_name {
            entry.discord_name = v.clone();
        }
        if let Some(v) = update.scam_method {
            entry.scam_method = v;
        }
        if let Some(v) = &update.description {
            entry.description = v.clone();
        }
        if let Some(v) = update.status {
            entry.status = v;
        }
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete(&self, token: &str, id: &str) -> Result<String> {
        self.record("delete")?;
        self.authorize(token)?;
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|e| e.id != id);
        if inner.entries.len() == before {
            return Err(not_found());
        }
        Ok("Record deleted".to_string())
    }

    async fn statistics(&self) -> Result<Statistics> {
        self.record("statistics")?;
        let inner = self.inner.lock();
        let total = inner.entries.len() as u64;
        let active = inner
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Active)
            .count() as u64;
        Ok(Statistics {
            total_records: total,
            active_threats: active,
            verified: total,
        })
    }
}
