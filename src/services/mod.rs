pub mod ownership;

pub use ownership::{AccessError, OwnershipGuard, Resolvable};
