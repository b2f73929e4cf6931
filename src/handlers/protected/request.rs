use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{
    Folder, HttpMethod, NewParameter, Request, RequestContent, RequestDraft, Scheme,
};
use crate::middleware::{ApiResponse, ApiResult, AuthUser, Guarded, ValidJson, ValidQuery, WithChildren};
use crate::state::AppState;
use crate::types::{Depth, EntityId};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub folder_id: EntityId,
    pub protocol_header: Scheme,
    pub method: HttpMethod,
    #[serde(default)]
    pub parameters: Vec<NewParameter>,
}

/// Only the content fields are read; ids, name, folder and owner in the
/// payload are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequestBody {
    pub id: EntityId,
    #[serde(default)]
    pub url: String,
    pub protocol_header: Scheme,
    pub method: HttpMethod,
    #[serde(default)]
    pub parameters: Vec<NewParameter>,
    #[serde(default)]
    pub result: String,
}

impl From<UpdateRequestBody> for RequestContent {
    fn from(body: UpdateRequestBody) -> Self {
        Self {
            url: body.url,
            protocol_header: body.protocol_header,
            method: body.method,
            parameters: body.parameters,
            result: body.result,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RenameRequestQuery {
    pub name: String,
}

/// GET /request?requestId= - Request with its parameters
pub async fn show(Guarded { entity: request, .. }: Guarded<Request, WithChildren>) -> ApiResult<Request> {
    Ok(ApiResponse::success(request))
}

/// POST /request - Create a request inside one of the caller's folders
pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(body): ValidJson<CreateRequestBody>,
) -> ApiResult<Request> {
    // The request does not exist yet, so the parent folder is checked instead
    let folder: Folder = state
        .guard
        .resolve_id(&caller.user_id, body.folder_id, Depth::Shallow)
        .await?;

    let draft = RequestDraft {
        folder_id: folder.id,
        name: body.name,
        url: body.url,
        protocol_header: body.protocol_header,
        method: body.method,
        parameters: body.parameters,
    };
    let request = state.store.create_request(&caller.user_id, draft).await?;
    tracing::debug!("User '{}' created request {} in folder {}", caller.user_id, request.id, folder.id);
    Ok(ApiResponse::success(request))
}

/// PATCH /request - Replace url, scheme, method, parameters and result
pub async fn update(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidJson(body): ValidJson<UpdateRequestBody>,
) -> ApiResult<Request> {
    let existing: Request = state
        .guard
        .resolve_id(&caller.user_id, body.id, Depth::Shallow)
        .await?;

    let updated = state.store.update_request(existing.id, body.into()).await?;
    Ok(ApiResponse::success(updated))
}

/// DELETE /request?requestId= - Delete a request and its parameters
pub async fn delete(
    State(state): State<AppState>,
    Guarded { entity: request, .. }: Guarded<Request>,
) -> ApiResult<()> {
    state.store.delete_request(request.id).await?;
    Ok(ApiResponse::no_content())
}

/// PATCH /request/rename?requestId=&name= - Change only the name
pub async fn rename(
    State(state): State<AppState>,
    Guarded { entity: request, .. }: Guarded<Request>,
    ValidQuery(query): ValidQuery<RenameRequestQuery>,
) -> ApiResult<Value> {
    state.store.rename_request(request.id, &query.name).await?;
    Ok(ApiResponse::success(json!({
        "message": "request renamed",
        "id": request.id,
        "name": query.name,
    })))
}

/// PATCH /request/transfer?requestId=&folderId= - Move a request to another of the caller's folders
pub async fn transfer(
    State(state): State<AppState>,
    Guarded { entity: request, .. }: Guarded<Request>,
    Guarded { entity: folder, .. }: Guarded<Folder>,
) -> ApiResult<Value> {
    if request.folder_id != folder.id {
        state.store.move_request(request.id, folder.id).await?;
        tracing::debug!("Moved request {} from folder {} to {}", request.id, request.folder_id, folder.id);
    }
    Ok(ApiResponse::success(json!({
        "message": "request transferred",
        "id": request.id,
        "folderId": folder.id,
    })))
}
