pub mod auth;
pub mod extract;
pub mod guard;
pub mod response;

pub use auth::AuthUser;
pub use extract::{ValidJson, ValidQuery};
pub use guard::{Guarded, Shallow, WithChildren};
pub use response::{ApiResponse, ApiResult};
