//! reqwest implementation of the registry API

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::RegistryApi;
use crate::error::{ConsoleError, Result};
use crate::models::{
    Credentials, EntryUpdate, ErrorBody, ListQuery, MessageBody, NewEntry, ScammerEntry,
    Statistics, TokenResponse, UserProfile,
};

/// Client for one registry API deployment
#[derive(Clone)]
pub struct HttpRegistry {
    client: Client,
    base_url: Url,
}

impl HttpRegistry {
    /// `base_url` is the server root; the `/api/` prefix is appended here.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self> {
        let invalid = |message: String| ConsoleError::BaseUrl {
            url: base_url.to_string(),
            message,
        };

        let mut root = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if root.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".to_string()));
        }
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        let base_url = root.join("api/").map_err(|e| invalid(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| ConsoleError::BaseUrl {
            url: self.base_url.to_string(),
            message: e.to_string(),
        })
    }

    fn entry_endpoint(&self, id: &str) -> Result<Url> {
        self.endpoint(&format!("scammers/{}", urlencoding::encode(id)))
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        authenticated: bool,
    ) -> Result<T> {
        let response = check_status(builder.send().await?, authenticated).await?;
        Ok(response.json().await?)
    }
}

/// Map non-2xx responses to errors.
///
/// A 401 on a request that carried a bearer token means the session is no
/// longer valid; on an anonymous request (login) it is an ordinary API error
/// whose detail explains what went wrong.
async fn check_status(response: Response, authenticated: bool) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().clone();
    if authenticated && status == StatusCode::UNAUTHORIZED {
        warn!("Bearer token rejected by {}", url);
        return Err(ConsoleError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.message())
        .unwrap_or_else(|_| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                body
            }
        });

    debug!("{} -> {}: {}", url, status, detail);
    Err(ConsoleError::Api { status, detail })
}

#[async_trait]
impl RegistryApi for HttpRegistry {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        let url = self.endpoint("auth/login")?;
        let builder = self.request(Method::POST, url, None).json(credentials);
        self.send_json(builder, false).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<UserProfile> {
        let url = self.endpoint("auth/register")?;
        let builder = self.request(Method::POST, url, None).json(credentials);
        self.send_json(builder, false).await
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile> {
        let url = self.endpoint("auth/me")?;
        let builder = self.request(Method::GET, url, Some(token));
        self.send_json(builder, true).await
    }

    async fn list_public(&self, query: &ListQuery) -> Result<Vec<ScammerEntry>> {
        let url = self.endpoint("scammers/public")?;
        let builder = self.request(Method::GET, url, None).query(query);
        self.send_json(builder, false).await
    }

    async fn list(&self, token: &str, query: &ListQuery) -> Result<Vec<ScammerEntry>> {
        let url = self.endpoint("scammers")?;
        let builder = self.request(Method::GET, url, Some(token)).query(query);
        self.send_json(builder, true).await
    }

    async fn get(&self, token: &str, id: &str) -> Result<ScammerEntry> {
        let url = self.entry_endpoint(id)?;
        let builder = self.request(Method::GET, url, Some(token));
        self.send_json(builder, true).await
    }

    async fn create(&self, token: &str, entry: &NewEntry) -> Result<ScammerEntry> {
        let url = self.endpoint("scammers")?;
        let builder = self.request(Method::POST, url, Some(token)).json(entry);
        self.send_json(builder, true).await
    }

    async fn update(&self, token: &str, id: &str, update: &EntryUpdate) -> Result<ScammerEntry> {
        let url = self.entry_endpoint(id)?;
        let builder = self.request(Method::PUT, url, Some(token)).json(update);
        self.send_json(builder, true).await
    }

    async fn delete(&self, token: &str, id: &str) -> Result<String> {
        let url = self.entry_endpoint(id)?;
        let builder = self.request(Method::DELETE, url, Some(token));
        let body: MessageBody = self.send_json(builder, true).await?;
        Ok(body.message)
    }

    async fn statistics(&self) -> Result<Statistics> {
        let url = self.endpoint("statistics")?;
        let builder = self.request(Method::GET, url, None);
        self.send_json(builder, false).await
    }
}
