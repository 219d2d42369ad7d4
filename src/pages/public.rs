//! Public listing (`/`): anonymous read-only view of the registry

use std::sync::Arc;
use tracing::{error, info};

use super::find_entry;
use crate::api::RegistryApi;
use crate::error::Result;
use crate::models::{ListQuery, ScammerEntry, Statistics};
use crate::search::filter_entries;

pub struct PublicPage {
    api: Arc<dyn RegistryApi>,
    limit: u32,
    entries: Vec<ScammerEntry>,
    visible: Vec<ScammerEntry>,
    search_term: String,
    stats: Option<Statistics>,
}

impl PublicPage {
    pub fn new(api: Arc<dyn RegistryApi>, limit: u32) -> Self {
        Self {
            api,
            limit,
            entries: Vec::new(),
            visible: Vec::new(),
            search_term: String::new(),
            stats: None,
        }
    }

    /// Fetch the public list, then the statistics
    pub async fn load(&mut self) -> Result<()> {
        let entries = self
            .api
            .list_public(&ListQuery::with_limit(self.limit))
            .await
            .map_err(|e| {
                error!("Failed to load public registry: {}", e);
                e
            })?;
        info!("Loaded {} public records", entries.len());
        self.entries = entries;
        self.visible = filter_entries(&self.entries, &self.search_term);

        self.stats = Some(self.api.statistics().await.map_err(|e| {
            error!("Failed to load statistics: {}", e);
            e
        })?);
        Ok(())
    }

    pub fn search(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.visible = filter_entries(&self.entries, term);
    }

    pub fn visible(&self) -> &[ScammerEntry] {
        &self.visible
    }

    pub fn stats(&self) -> Option<&Statistics> {
        self.stats.as_ref()
    }

    /// Detail view lookup; public visitors only see what was listed
    pub fn find(&self, key: &str) -> Option<&ScammerEntry> {
        find_entry(&self.visible, &self.entries, key)
    }
}
