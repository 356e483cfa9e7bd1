use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "API-Key";

/// Proof that the request carried the configured shared secret.
pub struct ApiKey;

#[async_trait]
impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let expected = state
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let supplied = parts
            .headers
            .get(API_KEY_HEADER)
            .ok_or(AppError::Unauthorized)?
            .to_str()
            .map_err(|_| AppError::Unauthorized)?;

        if bool::from(supplied.as_bytes().ct_eq(expected.as_bytes())) {
            Ok(ApiKey)
        } else {
            Err(AppError::Unauthorized)
        }
    }
}
