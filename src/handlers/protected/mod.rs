// handlers/protected/mod.rs - Handlers that require a verified caller
//
// Every handler here takes either `AuthUser` or `Guarded<T, D>`. The latter
// has already resolved the addressed folder/request and confirmed the caller
// owns it, at the depth named in the handler signature.

pub mod folder;
pub mod request;
pub mod user;
