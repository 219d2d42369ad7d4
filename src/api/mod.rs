//! Registry API client
//!
//! `RegistryApi` is the seam between page logic and the network. Protected
//! calls take the bearer token as an explicit argument; there is no shared
//! default header that could leak between sessions.

mod http;

pub use http::HttpRegistry;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Credentials, EntryUpdate, ListQuery, NewEntry, ScammerEntry, Statistics, TokenResponse,
    UserProfile,
};

#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// `POST /api/auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse>;

    /// `POST /api/auth/register`
    async fn register(&self, credentials: &Credentials) -> Result<UserProfile>;

    /// `GET /api/auth/me`
    async fn current_user(&self, token: &str) -> Result<UserProfile>;

    /// `GET /api/scammers/public`
    async fn list_public(&self, query: &ListQuery) -> Result<Vec<ScammerEntry>>;

    /// `GET /api/scammers`
    async fn list(&self, token: &str, query: &ListQuery) -> Result<Vec<ScammerEntry>>;

    /// `GET /api/scammers/{id}`
    async fn get(&self, token: &str, id: &str) -> Result<ScammerEntry>;

    /// `POST /api/scammers`
    async fn create(&self, token: &str, entry: &NewEntry) -> Result<ScammerEntry>;

    /// `PUT /api/scammers/{id}`
    async fn update(&self, token: &str, id: &str, update: &EntryUpdate) -> Result<ScammerEntry>;

    /// `DELETE /api/scammers/{id}`, returns the server's confirmation message
    async fn delete(&self, token: &str, id: &str) -> Result<String>;

    /// `GET /api/statistics`
    async fn statistics(&self) -> Result<Statistics>;
}
