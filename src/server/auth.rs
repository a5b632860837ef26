//! API key authorization for mutating requests

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use tracing::warn;

use crate::error::ApiError;
use crate::server::AppState;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Query parameter carrying the API key
pub const API_KEY_QUERY: &str = "apiKey";

/// Decides whether a presented key may mutate the collection
pub trait Authorizer: Send + Sync {
    fn authorize(&self, presented: Option<&str>) -> bool;
}

/// Single shared secret, compared by exact match
pub struct ApiKey {
    secret: String,
}

impl ApiKey {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl Authorizer for ApiKey {
    fn authorize(&self, presented: Option<&str>) -> bool {
        presented == Some(self.secret.as_str())
    }
}

/// API key as it arrived with a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentedKey {
    /// No usable key in the query or the header
    Missing,
    /// A single key
    Key(String),
    /// `apiKey` repeated in the query string; never authorized
    Ambiguous,
}

impl PresentedKey {
    fn as_deref(&self) -> Option<&str> {
        match self {
            PresentedKey::Key(key) => Some(key),
            PresentedKey::Missing | PresentedKey::Ambiguous => None,
        }
    }
}

/// Key supplied with the request: the `apiKey` query parameter if present
/// and non-empty, otherwise the `x-api-key` header. A repeated `apiKey`
/// parameter is ambiguous and shadows the header.
pub fn presented_key(parts: &Parts) -> PresentedKey {
    let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
        .map(|Query(pairs)| pairs)
        .unwrap_or_default();
    let mut from_query = pairs
        .into_iter()
        .filter(|(name, _)| name == API_KEY_QUERY)
        .map(|(_, value)| value);

    match (from_query.next(), from_query.next()) {
        (Some(_), Some(_)) => return PresentedKey::Ambiguous,
        (Some(key), None) if !key.is_empty() => return PresentedKey::Key(key),
        _ => {}
    }

    parts
        .headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|key| !key.is_empty())
        .map_or(PresentedKey::Missing, |key| PresentedKey::Key(key.to_string()))
}

/// Extractor proving the request passed the authorization gate
///
/// Put it before the body extractor so a denied request never has its
/// body read.
#[derive(Debug, Clone, Copy)]
pub struct Authorized;

#[async_trait]
impl FromRequestParts<AppState> for Authorized {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let key = presented_key(parts);
        let allowed = key != PresentedKey::Ambiguous && state.authorizer().authorize(key.as_deref());
        if allowed {
            Ok(Authorized)
        } else {
            warn!(
                method = %parts.method,
                path = %parts.uri.path(),
                key_present = key != PresentedKey::Missing,
                "Rejected request with invalid API key"
            );
            Err(ApiError::Unauthorized)
        }
    }
}
