use axum::extract::State;

use crate::database::models::{NewUser, User};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::state::AppState;

/// POST /user - Register a new user
///
/// Expected Input:
/// ```json
/// { "id": "alice", "name": "Alice", "password": "pw1" }
/// ```
///
/// The id is chosen by the caller; a taken id is rejected by the store.
/// The response echoes the created user without its password.
pub async fn register(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<NewUser>,
) -> ApiResult<User> {
    if payload.id.trim().is_empty() {
        return Err(ApiError::validation_error("User id must not be empty", None));
    }

    let user = state.store.create_user(payload).await?;
    tracing::info!("Registered user '{}'", user.id);
    Ok(ApiResponse::success(user))
}
