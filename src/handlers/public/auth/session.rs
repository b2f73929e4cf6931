use axum::extract::State;
use serde::Deserialize;

use crate::auth::Session;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::state::AppState;
use crate::types::Depth;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub id: String,
    pub password: String,
}

/// POST /login - Exchange id and password for a session credential
///
/// Expected Input:
/// ```json
/// { "id": "alice", "password": "pw1" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI...", "expiresAt": 1760000000 }
/// ```
///
/// Unknown id and wrong password produce the same 400 response.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> ApiResult<Session> {
    let user = state.store.find_user(&payload.id, Depth::Shallow).await?;

    // Plain equality against the stored value; see DESIGN.md before changing
    let Some(user) = user.filter(|u| u.password == payload.password) else {
        tracing::info!("Failed login for '{}'", payload.id);
        return Err(ApiError::bad_request("Invalid id or password"));
    };

    let session = state.verifier.issue(&user.id).map_err(|e| {
        tracing::error!("Failed to issue session credential: {}", e);
        ApiError::internal_server_error("Failed to issue session credential")
    })?;

    tracing::info!("User '{}' logged in", user.id);
    Ok(ApiResponse::success(session))
}
