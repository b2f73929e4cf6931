use serde::{Deserialize, Serialize};

use super::{Owned, Request};
use crate::types::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: EntityId,
    pub name: String,
    pub user_id: String,
    /// Only populated by detail lookups
    #[serde(default)]
    pub requests: Vec<Request>,
}

impl Owned for Folder {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}
