use std::collections::HashMap;
use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::database::models::{Folder, Request};
use crate::error::ApiError;
use crate::services::Resolvable;
use crate::state::AppState;
use crate::types::Depth;

use super::auth::AuthUser;

/// Load depth chosen by the handler signature
pub trait LoadDepth: Send + Sync + 'static {
    const DEPTH: Depth;
}

/// Own columns only
pub struct Shallow;

/// Own columns plus child rows
pub struct WithChildren;

impl LoadDepth for Shallow {
    const DEPTH: Depth = Depth::Shallow;
}

impl LoadDepth for WithChildren {
    const DEPTH: Depth = Depth::WithChildren;
}

/// Entities addressed by a query parameter
pub trait Addressable: Resolvable {
    const ID_PARAM: &'static str;
}

impl Addressable for Folder {
    const ID_PARAM: &'static str = "folderId";
}

impl Addressable for Request {
    const ID_PARAM: &'static str = "requestId";
}

/// An entity resolved from its id query parameter and confirmed to belong
/// to the caller, loaded at depth `D`.
pub struct Guarded<T, D = Shallow> {
    pub caller: AuthUser,
    pub entity: T,
    _depth: PhantomData<D>,
}

#[async_trait]
impl<T, D> FromRequestParts<AppState> for Guarded<T, D>
where
    T: Addressable,
    D: LoadDepth,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = AuthUser::from_request_parts(parts, state).await?;

        let Query(params) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)?;
        let raw_id = params.get(T::ID_PARAM).map(String::as_str).unwrap_or_default();

        let entity = state.guard.resolve::<T>(&caller.user_id, raw_id, D::DEPTH).await?;
        Ok(Self {
            caller,
            entity,
            _depth: PhantomData,
        })
    }
}
