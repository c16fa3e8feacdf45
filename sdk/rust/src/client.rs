//! Pushbullet client implementation.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client as HttpClient, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{PushbulletError, Result};

const DEFAULT_SERVER: &str = "https://api.pushbullet.com/v2";
const DEFAULT_STREAM_URL: &str = "wss://stream.pushbullet.com/websocket";
const DEFAULT_USER_AGENT: &str = concat!("pushbullet-rs/", env!("CARGO_PKG_VERSION"));
const ENV_VAR_NAME: &str = "PUSHBULLET_API_KEY";

/// Builder for creating a Pushbullet client with custom options.
#[derive(Debug, Clone)]
pub struct PushbulletBuilder {
    api_key: String,
    server: String,
    stream_url: String,
    user_agent: String,
    timeout: Option<Duration>,
}

impl PushbulletBuilder {
    /// Create a new builder with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            server: DEFAULT_SERVER.to_string(),
            stream_url: DEFAULT_STREAM_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }

    /// Set the REST base URL (everything before `/devices`, `/pushes`, ...).
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Set the realtime stream endpoint. The API key is appended as the last path segment.
    pub fn stream_url(mut self, stream_url: impl Into<String>) -> Self {
        self.stream_url = stream_url.into();
        self
    }

    /// Set the User-Agent sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Bound every REST request by `timeout`. Unset by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the Pushbullet client.
    pub fn build(self) -> Result<Pushbullet> {
        if self.api_key.trim().is_empty() {
            return Err(PushbulletError::auth("API key must not be empty"));
        }

        let mut http = HttpClient::builder().user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http_client = http
            .build()
            .map_err(|e| PushbulletError::connection(e.to_string()))?;

        Ok(Pushbullet {
            inner: Arc::new(PushbulletInner {
                api_key: self.api_key,
                server: self.server.trim_end_matches('/').to_string(),
                stream_url: self.stream_url.trim_end_matches('/').to_string(),
                http_client,
            }),
        })
    }
}

/// Internal shared state for the client.
pub(crate) struct PushbulletInner {
    pub(crate) api_key: String,
    pub(crate) server: String,
    pub(crate) stream_url: String,
    pub(crate) http_client: HttpClient,
}

/// The Pushbullet client.
///
/// Cloning is cheap; clones share the credential and the HTTP transport.
///
/// # Example
///
/// ```no_run
/// use pushbullet::Pushbullet;
///
/// #[tokio::main]
/// async fn main() -> pushbullet::Result<()> {
///     let client = Pushbullet::from_env()?;
///
///     for device in client.devices().await? {
///         println!("{:?} {:?}", device.iden, device.nickname);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Pushbullet {
    pub(crate) inner: Arc<PushbulletInner>,
}

impl Pushbullet {
    /// Create a client with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        PushbulletBuilder::new(api_key).build()
    }

    /// Create a new client from environment variables.
    ///
    /// Reads the API key from the `PUSHBULLET_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(ENV_VAR_NAME).map_err(|_| {
            PushbulletError::auth(format!("{} environment variable not set", ENV_VAR_NAME))
        })?;

        PushbulletBuilder::new(api_key).build()
    }

    /// Create a new builder with the given API key.
    pub fn builder(api_key: impl Into<String>) -> PushbulletBuilder {
        PushbulletBuilder::new(api_key)
    }

    /// Get the configured REST base URL.
    pub fn server_url(&self) -> &str {
        &self.inner.server
    }

    /// Issue one authenticated request against the REST API.
    ///
    /// `path` is appended to the server URL. The body, when present, is sent as JSON.
    /// Non-2xx responses become [`PushbulletError::Api`]; an empty success body
    /// deserializes as JSON `null`.
    pub(crate) async fn execute<B, T>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.inner.server, path);
        debug!(%method, path, "pushbullet request");

        let mut request = self
            .inner
            .http_client
            .request(method, &url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .basic_auth(&self.inner.api_key, Some(""));

        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), path, "pushbullet response");

        if !status.is_success() {
            return Err(PushbulletError::api(status.as_u16(), text));
        }

        if text.trim().is_empty() {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_str(&text)?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.execute::<(), T>(Method::GET, path, query, None).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(Method::POST, path, &[], Some(body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<serde_json::Value> {
        self.execute::<(), _>(Method::DELETE, path, &[], None).await
    }
}
