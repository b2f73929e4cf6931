// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Liveness, login and registration. Nothing here reads the Authorization header.

pub mod auth;
pub mod status;

pub use auth::*;
pub use status::{health, ping};
