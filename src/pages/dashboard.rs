//! Admin dashboard (`/admin/dashboard`): protected list plus create, update
//! and delete.
//!
//! Every mutation is followed by a statistics refetch so the counters match
//! the registry. A 401 from any protected call drops the session; the caller
//! then re-runs the route guard and ends up on the login view.

use std::sync::Arc;
use tracing::{error, info, warn};

use super::find_entry;
use crate::api::RegistryApi;
use crate::error::{ConsoleError, Result};
use crate::form::{EntryForm, FormMode};
use crate::messages;
use crate::models::{ListQuery, ScammerEntry, Statistics};
use crate::routes::{guard, GuardDecision, Route};
use crate::search::filter_entries;
use crate::session::SessionStore;
use crate::ui::Notice;

pub struct DashboardPage {
    api: Arc<dyn RegistryApi>,
    session: Arc<SessionStore>,
    limit: u32,
    entries: Vec<ScammerEntry>,
    visible: Vec<ScammerEntry>,
    search_term: String,
    stats: Option<Statistics>,
    notice: Option<Notice>,
}

impl DashboardPage {
    pub fn new(api: Arc<dyn RegistryApi>, session: Arc<SessionStore>, limit: u32) -> Self {
        Self {
            api,
            session,
            limit,
            entries: Vec::new(),
            visible: Vec::new(),
            search_term: String::new(),
            stats: None,
            notice: None,
        }
    }

    pub fn guard(&self) -> GuardDecision {
        guard(Route::AdminDashboard, &self.session.state())
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Fetch the protected list, then the statistics
    pub async fn load(&mut self) -> Result<()> {
        let token = self.token()?;
        let entries = match self
            .api
            .list(&token, &ListQuery::with_limit(self.limit))
            .await
        {
            Ok(entries) => entries,
            Err(e) => return Err(self.fail("Failed to load records", e)),
        };
        info!("Loaded {} records", entries.len());
        self.entries = entries;
        self.refilter();

        match self.api.statistics().await {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => return Err(self.fail("Failed to load statistics", e)),
        }
        Ok(())
    }

    pub fn search(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.refilter();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn visible(&self) -> &[ScammerEntry] {
        &self.visible
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[ScammerEntry] {
        &self.entries
    }

    pub fn stats(&self) -> Option<&Statistics> {
        self.stats.as_ref()
    }

    /// Last success or error message, cleared once taken
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn find(&self, key: &str) -> Option<&ScammerEntry> {
        find_entry(&self.visible, &self.entries, key)
    }

    /// Look a record up locally, falling back to `GET /api/scammers/{id}`
    pub async fn view(&mut self, key: &str) -> Result<ScammerEntry> {
        if let Some(entry) = self.find(key) {
            return Ok(entry.clone());
        }

        let token = self.token()?;
        match self.api.get(&token, key.trim()).await {
            Ok(entry) => Ok(entry),
            Err(ConsoleError::Api { status, .. }) if status == reqwest::StatusCode::NOT_FOUND => {
                Err(ConsoleError::EntryNotFound {
                    id: key.trim().to_string(),
                })
            }
            Err(e) => Err(self.fail("Failed to load record", e)),
        }
    }

    /// Submit a create or edit form. Invalid forms never reach the API.
    pub async fn submit(&mut self, form: &mut EntryForm) -> Result<ScammerEntry> {
        match form.mode().clone() {
            FormMode::Create => self.create(form).await,
            FormMode::Edit { id } => self.update(&id, form).await,
        }
    }

    async fn create(&mut self, form: &mut EntryForm) -> Result<ScammerEntry> {
        let entry = form.to_new_entry()?;
        let token = self.token()?;

        let created = match self.api.create(&token, &entry).await {
            Ok(created) => created,
            Err(e) => return Err(self.fail("Failed to add record", e)),
        };
        info!("Created record {} for {}", created.id, created.discord_id);

        self.entries.push(created.clone());
        self.refilter();
        self.refresh_stats().await;
        self.notice = Some(Notice::Success(messages::record_added(&created)));
        Ok(created)
    }

    async fn update(&mut self, id: &str, form: &mut EntryForm) -> Result<ScammerEntry> {
        let update = form.to_update()?;
        let token = self.token()?;

        let updated = match self.api.update(&token, id, &update).await {
            Ok(updated) => updated,
            Err(e) => return Err(self.fail("Failed to update record", e)),
        };
        info!("Updated record {}", updated.id);

        if let Some(slot) = self.entries.iter_mut().find(|e| e.id == updated.id) {
            *slot = updated.clone();
        }
        self.refilter();
        self.refresh_stats().await;
        self.notice = Some(Notice::Success(messages::record_updated(&updated)));
        Ok(updated)
    }

    /// Delete by record id. Confirmation is the caller's job.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        let token = self.token()?;

        let message = match self.api.delete(&token, id).await {
            Ok(message) => message,
            Err(e) => return Err(self.fail("Failed to delete record", e)),
        };
        info!("Deleted record {}: {}", id, message);

        self.entries.retain(|e| e.id != id);
        self.refilter();
        self.refresh_stats().await;
        self.notice = Some(Notice::Success(messages::record_deleted()));
        Ok(())
    }

    /// Refetch the counters. A failure here does not undo the mutation that
    /// preceded it; the old counters stay and a warning is logged.
    pub async fn refresh_stats(&mut self) {
        match self.api.statistics().await {
            Ok(stats) => self.stats = Some(stats),
            Err(e) => warn!("Could not refresh statistics: {}", e),
        }
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.entries.clear();
        self.visible.clear();
        self.stats = None;
    }

    fn token(&self) -> Result<String> {
        self.session.require_token()
    }

    fn refilter(&mut self) {
        self.visible = filter_entries(&self.entries, &self.search_term);
    }

    /// Common failure path: 401 ends the session, everything else becomes a
    /// notice. The error is handed back for the caller to act on.
    fn fail(&mut self, context: &str, err: ConsoleError) -> ConsoleError {
        if err.is_unauthorized() {
            self.session.handle_unauthorized();
            self.entries.clear();
            self.visible.clear();
        } else {
            error!("{}: {}", context, err);
        }
        self.notice = Some(Notice::Error(format!("{}: {}", context, err.user_message())));
        err
    }
}
