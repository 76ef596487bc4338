use thiserror::Error;

/// Top-level error type for the `moonward-api` crate.
///
/// Covers every transport-facing failure mode: HTTP status errors,
/// connection problems, and payload decoding. `moonward-core` maps these
/// into domain-level diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The token source could not produce a usable access token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── HTTP ────────────────────────────────────────────────────────
    /// Non-2xx response from the service.
    ///
    /// `message` is taken from the `detail` field of a
    /// `application/problem+json` body when present, otherwise the raw
    /// response text. `error_code` is the provider's machine-readable
    /// code (`errorCode`), when the problem body carries one.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        error_code: Option<String>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx response body did not match the expected payload shape.
    /// Distinct from [`Http`](Self::Http): the service answered, but with
    /// a document this client does not recognize.
    #[error("Malformed payload for {endpoint}: {message}")]
    Payload {
        endpoint: &'static str,
        message: String,
    },
}

impl Error {
    /// Returns `true` if this error carries an HTTP status code equal to
    /// `status`.
    pub fn is_status(&self, status: u16) -> bool {
        matches!(self, Self::Http { status: s, .. } if *s == status)
    }

    /// Returns `true` if this is a "not found" HTTP error.
    pub fn is_not_found(&self) -> bool {
        self.is_status(404)
    }

    /// Extract the provider error code, if available.
    pub fn provider_code(&self) -> Option<&str> {
        match self {
            Self::Http { error_code, .. } => error_code.as_deref(),
            _ => None,
        }
    }
}
