/// Shared types used across the codebase

/// Row identifier for folders, requests and parameters.
/// Users are keyed by a caller-chosen string instead.
pub type EntityId = i64;

/// How much of an entity's subtree a lookup loads.
/// Chosen by the endpoint, passed down to the store unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Only the entity's own columns
    Shallow,
    /// The entity plus its child rows (detail views)
    WithChildren,
}

impl Depth {
    pub fn loads_children(self) -> bool {
        matches!(self, Depth::WithChildren)
    }
}
