use axum::extract::State;
use serde::Deserialize;

use crate::database::models::Folder;
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Guarded, ValidQuery, WithChildren};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateFolderQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameFolderQuery {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
}

/// GET /folder?folderId= - Folder with its requests (parameters not loaded)
pub async fn show(Guarded { entity: folder, .. }: Guarded<Folder, WithChildren>) -> ApiResult<Folder> {
    Ok(ApiResponse::success(folder))
}

/// POST /folder?name= - Create an empty folder owned by the caller
pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidQuery(query): ValidQuery<CreateFolderQuery>,
) -> ApiResult<Folder> {
    let folder = state.store.create_folder(&caller.user_id, &query.name).await?;
    tracing::debug!("User '{}' created folder {}", caller.user_id, folder.id);
    Ok(ApiResponse::success(folder))
}

/// PATCH /folder?folderId=&Name= - Rename a folder
pub async fn rename(
    State(state): State<AppState>,
    Guarded { entity: folder, .. }: Guarded<Folder>,
    ValidQuery(query): ValidQuery<RenameFolderQuery>,
) -> ApiResult<Folder> {
    state.store.rename_folder(folder.id, &query.name).await?;
    Ok(ApiResponse::success(Folder {
        name: query.name,
        ..folder
    }))
}

/// DELETE /folder?folderId= - Delete a folder with its requests and their parameters
pub async fn delete(
    State(state): State<AppState>,
    Guarded { entity: folder, caller, .. }: Guarded<Folder>,
) -> ApiResult<()> {
    state.store.delete_folder(folder.id).await?;
    tracing::debug!("User '{}' deleted folder {}", caller.user_id, folder.id);
    Ok(ApiResponse::no_content())
}
