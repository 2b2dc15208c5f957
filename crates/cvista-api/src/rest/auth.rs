// Session authentication
//
// Cookie-based login/logout against the portal's `.do` endpoints. The
// login response sets a session cookie in the client's jar; subsequent
// requests carry it automatically.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::Error;
use crate::rest::client::CvpClient;
use crate::rest::models::{Envelope, ErrorResponse};

/// Shape of the `authenticate.do` response. Only the embedded error
/// fields matter here; the session itself rides in a cookie, not the
/// body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    #[serde(default)]
    session_id: Option<String>,
    #[serde(flatten)]
    error: ErrorResponse,
}

impl Envelope for LoginResponse {
    fn error_response(&self) -> &ErrorResponse {
        &self.error
    }
}

impl CvpClient {
    /// Authenticate with the portal using username/password.
    ///
    /// `POST /web/login/authenticate.do`
    ///
    /// On success the session cookie is stored in the client's cookie
    /// jar and used for all subsequent requests. Rejected credentials
    /// surface as [`Error::Authentication`] whether the portal answers
    /// with a non-2xx status or an embedded error code.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        const OP: &str = "login";

        debug!(username, "logging in");

        let body = json!({
            "userId": username,
            "password": password.expose_secret(),
        });

        let info: LoginResponse = self
            .post_json(OP, "login/authenticate.do", &body)
            .await
            .map_err(|e| match e {
                Error::Http { status, body, .. } => Error::Authentication {
                    operation: OP,
                    message: format!("login failed (HTTP {status}): {body}"),
                },
                other => other,
            })?;

        info.ensure_ok(OP).map_err(|e| match e {
            Error::Api { code, message, .. } => Error::Authentication {
                operation: OP,
                message: format!("login rejected ({code}): {message}"),
            },
            other => other,
        })?;

        debug!(
            has_session = info.session_id.is_some(),
            "login successful"
        );
        Ok(())
    }

    /// End the current session.
    ///
    /// `POST /web/login/logout.do`
    pub async fn logout(&self) -> Result<(), Error> {
        const OP: &str = "logout";

        debug!("logging out");

        let info: ErrorResponse = self.post_json(OP, "login/logout.do", &json!({})).await?;
        info.ensure_ok(OP)?;

        debug!("logout complete");
        Ok(())
    }
}
