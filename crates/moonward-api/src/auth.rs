// Authentication seam.
//
// The OAuth/PKCE dance lives outside this crate; the client only needs a
// bearer token, an expiry signal, and a way to trigger a refresh. The
// dispatcher checks `is_expired()` and awaits `refresh()` BEFORE building
// each request, so a stale token never reaches the wire.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use secrecy::SecretString;

use crate::Error;

/// A source of bearer tokens for the Moon API.
///
/// Implementations own the token lifecycle (storage, refresh-token
/// exchange). [`refresh`](TokenProvider::refresh) is only invoked when
/// [`is_expired`](TokenProvider::is_expired) reports `true`, and always
/// completes before the request that triggered it is sent.
pub trait TokenProvider: Send + Sync {
    /// The account identifier the token is scoped to.
    fn account_id(&self) -> &str;

    /// The current access token.
    fn access_token(&self) -> SecretString;

    /// Whether the access token is expired or expiring within the
    /// provider's grace window.
    fn is_expired(&self) -> bool;

    /// Obtain a fresh access token from the refresh token.
    fn refresh(&self) -> BoxFuture<'_, Result<(), Error>>;
}

/// Shared handle to a token provider.
pub type AuthHandle = Arc<dyn TokenProvider>;

/// A fixed, never-expiring token. Intended for tests and short-lived
/// scripts that already hold a valid token.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    account_id: String,
    token: SecretString,
}

impl StaticTokenProvider {
    pub fn new(account_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            token: SecretString::from(token.into()),
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn account_id(&self) -> &str {
        &self.account_id
    }

    fn access_token(&self) -> SecretString {
        self.token.clone()
    }

    fn is_expired(&self) -> bool {
        false
    }

    fn refresh(&self) -> BoxFuture<'_, Result<(), Error>> {
        Box::pin(async {
            Err(Error::Authentication {
                message: "static token cannot be refreshed".into(),
            })
        })
    }
}
