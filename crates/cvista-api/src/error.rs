use thiserror::Error;

/// Top-level error type for the `cvista-api` crate.
///
/// Every operation-scoped variant carries the name of the failing client
/// method, so messages stay traceable when bubbled through callers. The
/// client never retries: create and update are not idempotent at this
/// layer, so recovery belongs to whoever holds more context.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed or the session is no longer valid (HTTP 401).
    #[error("{operation}: authentication failed: {message}")]
    Authentication {
        operation: &'static str,
        message: String,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("{operation}: HTTP transport error: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx status from the portal, with a body preview.
    #[error("{operation}: HTTP {status}: {body}")]
    Http {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Service ─────────────────────────────────────────────────────
    /// Embedded error from a response envelope. The service signals most
    /// logical failures (duplicate name, unknown key) inside HTTP 200
    /// bodies via `errorCode`/`errorMessage` fields.
    #[error("{operation}: CVP error {code}: {message}")]
    Api {
        operation: &'static str,
        code: String,
        message: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("{operation}: deserialization error: {message}")]
    Deserialization {
        operation: &'static str,
        message: String,
        body: String,
    },
}

/// Well-known CVP fault codes this client treats specially.
///
/// The numbering scheme is owned by the service. Every raw literal is
/// confined to [`ServiceFault::from_code`] so client logic only ever
/// compares enum values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ServiceFault {
    /// The named entity does not exist on the server.
    EntityNotFound,
    /// The session is missing, expired, or lacks permission.
    Unauthorized,
}

impl ServiceFault {
    /// Classify a raw `errorCode` literal.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "132801" => Some(Self::EntityNotFound),
            "112498" => Some(Self::Unauthorized),
            _ => None,
        }
    }
}

impl Error {
    /// Classification of an [`Error::Api`] embedded code, if it maps to
    /// a known fault.
    pub fn fault(&self) -> Option<ServiceFault> {
        match self {
            Self::Api { code, .. } => ServiceFault::from_code(code),
            _ => None,
        }
    }

    /// Returns `true` if this error indicates auth has expired and
    /// re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
            || self.fault() == Some(ServiceFault::Unauthorized)
    }

    /// Returns `true` if this error reports a missing entity.
    ///
    /// Fetch-by-name already translates the service's not-found code into
    /// an absent result; other operations surface it here.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
            || self.fault() == Some(ServiceFault::EntityNotFound)
    }

    /// Returns `true` if this is a transient transport failure a higher
    /// layer might retry (this client itself never does).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_timeout() || source.is_connect(),
            _ => false,
        }
    }
}
