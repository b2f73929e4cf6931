// Token acquisition and account creation; no credential required.

pub mod session; // POST /login
pub mod user; // POST /user

pub use session::login as session_login;
pub use user::register as user_register;
