// REST HTTP client
//
// Wraps `reqwest::Client` with CVP-specific URL construction, status
// mapping, and JSON decoding. Endpoint modules (configlet, auth) are
// implemented as inherent methods via separate files to keep this module
// focused on transport mechanics.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the CVP REST API.
///
/// Handles `/web`-prefixed URL construction, non-2xx status mapping, and
/// JSON decoding. Embedded-error classification happens in the endpoint
/// modules after decode, via the envelope capability in
/// [`models`](crate::rest::models) -- the service reports most logical
/// failures inside HTTP 200 bodies.
pub struct CvpClient {
    http: reqwest::Client,
    base_url: Url,
    /// Cookie jar reference for inspecting the session cookie.
    cookie_jar: Option<Arc<Jar>>,
}

impl CvpClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies). `base_url` is the
    /// portal root, e.g. `https://cvp.example.com`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let cookie_jar = config.cookie_jar.clone();
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            cookie_jar,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Use this when you already have a client with a session cookie in
    /// its jar (e.g. one shared with other API surfaces).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            cookie_jar: None,
        }
    }

    /// The portal base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Extract the session cookie header value, if a jar is attached and
    /// holds cookies for the portal URL.
    pub fn cookie_header(&self) -> Option<String> {
        let jar = self.cookie_jar.as_ref()?;
        let cookies = jar.cookies(&self.base_url)?;
        cookies.to_str().ok().map(String::from)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/web/{path}`.
    ///
    /// All classic endpoints hang off the `/web` prefix, e.g.
    /// `https://host/web/configlet/getConfigletByName.do`.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let full = format!("{base}/web/{path}");
        Url::parse(&full).expect("invalid API URL")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the JSON response.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("GET {url} params={query:?}");

        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        Self::decode(operation, resp).await
    }

    /// Send a POST request with a JSON body and decode the JSON response.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.api_url(path);
        debug!("POST {url}");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        Self::decode(operation, resp).await
    }

    /// Map the HTTP status and decode the response body.
    ///
    /// HTTP 401 means the session cookie is gone; any other non-2xx
    /// surfaces with a body preview.
    async fn decode<T: DeserializeOwned>(
        operation: &'static str,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                operation,
                message: "session expired or invalid credentials".into(),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Http {
                operation,
                status: status.as_u16(),
                body: preview(&body).to_owned(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            operation,
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

/// First 200 bytes of a response body, clamped to a char boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
