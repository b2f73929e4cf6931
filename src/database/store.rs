use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Folder, NewUser, Request, RequestContent, RequestDraft, User};
use crate::types::{Depth, EntityId};

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence primitives the access layer and handlers call into.
///
/// Implementations must make every cascading operation (folder delete,
/// request delete, parameter-set replacement) atomic: either all rows are
/// written or none are. Writes addressing a row that no longer exists
/// report `StoreError::NotFound` rather than recreating it.
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> Result<(), StoreError>;

    // Users
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    /// `WithChildren` loads folders, their requests and those requests' parameters
    async fn find_user(&self, id: &str, depth: Depth) -> Result<Option<User>, StoreError>;
    async fn rename_user(&self, id: &str, name: &str) -> Result<(), StoreError>;

    // Folders
    async fn create_folder(&self, owner: &str, name: &str) -> Result<Folder, StoreError>;
    /// `WithChildren` loads the folder's requests, without their parameters
    async fn find_folder(&self, id: EntityId, depth: Depth) -> Result<Option<Folder>, StoreError>;
    async fn rename_folder(&self, id: EntityId, name: &str) -> Result<(), StoreError>;
    /// Deletes the folder, its requests and their parameters
    async fn delete_folder(&self, id: EntityId) -> Result<(), StoreError>;

    // Requests
    async fn create_request(&self, owner: &str, draft: RequestDraft) -> Result<Request, StoreError>;
    /// `WithChildren` loads the request's parameters
    async fn find_request(&self, id: EntityId, depth: Depth) -> Result<Option<Request>, StoreError>;
    /// Overwrites url, scheme, method and result, and replaces the parameter set
    async fn update_request(&self, id: EntityId, content: RequestContent) -> Result<Request, StoreError>;
    async fn rename_request(&self, id: EntityId, name: &str) -> Result<(), StoreError>;
    async fn move_request(&self, id: EntityId, folder_id: EntityId) -> Result<(), StoreError>;
    /// Deletes the request and its parameters
    async fn delete_request(&self, id: EntityId) -> Result<(), StoreError>;
}
