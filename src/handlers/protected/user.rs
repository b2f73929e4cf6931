use axum::extract::State;
use serde::Deserialize;

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidQuery};
use crate::state::AppState;
use crate::types::Depth;

#[derive(Debug, Deserialize)]
pub struct RenameUserQuery {
    #[serde(alias = "Name")]
    pub name: String,
}

/// GET /user - The caller's own account with folders, requests and parameters
pub async fn show(State(state): State<AppState>, caller: AuthUser) -> ApiResult<User> {
    let user = state
        .store
        .find_user(&caller.user_id, Depth::WithChildren)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    // The password field is never serialized; clear it anyway so it cannot leak through logs
    Ok(ApiResponse::success(User {
        password: String::new(),
        ..user
    }))
}

/// PATCH /user?name= - Rename the caller's own account
pub async fn rename(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidQuery(query): ValidQuery<RenameUserQuery>,
) -> ApiResult<()> {
    state.store.rename_user(&caller.user_id, &query.name).await?;
    Ok(ApiResponse::no_content())
}
