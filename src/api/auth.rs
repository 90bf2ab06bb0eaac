//! Shared-secret bearer authentication for administrative endpoints.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::app_state::AppState;
use crate::error::SweepError;

/// Extractor proving the request carried the configured sweep secret.
///
/// Rejects with [`SweepError::Unauthorized`] before the handler body runs.
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = SweepError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.sweep_secret.as_deref() else {
            tracing::warn!("admin call rejected: no sweep secret configured");
            return Err(SweepError::Unauthorized("admin endpoint disabled"));
        };

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(SweepError::Unauthorized("missing bearer credential"))?
            .to_str()
            .map_err(|_| SweepError::Unauthorized("malformed authorization header"))?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(SweepError::Unauthorized("missing bearer credential"))?;

        if !secrets_match(token.trim().as_bytes(), expected.as_bytes()) {
            tracing::warn!("admin call rejected: credential mismatch");
            return Err(SweepError::Unauthorized("invalid credential"));
        }
        Ok(Self)
    }
}

/// Compares two secrets without short-circuiting on the first mismatch.
fn secrets_match(given: &[u8], expected: &[u8]) -> bool {
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_match_requires_exact_bytes() {
        assert!(secrets_match(b"s3cret", b"s3cret"));
        assert!(!secrets_match(b"s3cret", b"s3creT"));
        assert!(!secrets_match(b"s3cre", b"s3cret"));
        assert!(!secrets_match(b"", b"s3cret"));
    }
}
