use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Verified caller identity.
///
/// Extracting it runs the credential verifier on the `Authorization` header.
/// The result is cached in the request extensions, so a handler that pulls
/// several guarded entities verifies the credential only once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { user_id: claims.sub }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let claims = state.verifier.verify_headers(&parts.headers)?;
        let user = AuthUser::from(claims);
        tracing::debug!("Authenticated user '{}'", user.user_id);

        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
