pub mod folder;
pub mod parameter;
pub mod request;
pub mod user;

pub use folder::Folder;
pub use parameter::{NewParameter, ParamKind, Parameter};
pub use request::{HttpMethod, Request, RequestContent, RequestDraft, Scheme};
pub use user::{NewUser, User};

/// Entities that belong to exactly one user.
pub trait Owned {
    /// Identifier of the owning user
    fn owner_id(&self) -> &str;
}
