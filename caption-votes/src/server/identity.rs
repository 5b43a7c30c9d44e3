//! Request authentication.
use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderName};
use caption_votes_shared::types::UserId;

/// Resolves the authenticated user of a request, if any.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<UserId>;
}

/// Trusts a user id header set by the identity gateway in front of the server.
///
/// A missing, non-UTF-8 or blank header means no session.
#[derive(Debug, Clone)]
pub struct TrustedHeaderIdentity {
    header: HeaderName,
}

impl TrustedHeaderIdentity {
    pub fn new(header: HeaderName) -> Self {
        Self { header }
    }
}

#[async_trait]
impl IdentityProvider for TrustedHeaderIdentity {
    async fn authenticate(&self, headers: &HeaderMap) -> Option<UserId> {
        let value = headers.get(&self.header)?.to_str().ok()?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn identity() -> TrustedHeaderIdentity {
        TrustedHeaderIdentity::new(HeaderName::from_static("x-user-id"))
    }

    #[tokio::test]
    async fn test_reads_trimmed_user_id() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static(" user-42 "));
        assert_eq!(identity().authenticate(&headers).await, Some("user-42".to_string()));
    }

    #[tokio::test]
    async fn test_missing_or_blank_header_is_anonymous() {
        assert_eq!(identity().authenticate(&HeaderMap::new()).await, None);

        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("   "));
        assert_eq!(identity().authenticate(&headers).await, None);
    }
}
