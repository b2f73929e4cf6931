use serde::{Deserialize, Serialize};

use super::Folder;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Stored as given at registration. Never serialized.
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(default)]
    pub folders: Vec<Folder>,
}

/// Registration payload handed to the store
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub id: String,
    pub name: String,
    pub password: String,
}

impl From<NewUser> for User {
    fn from(new: NewUser) -> Self {
        Self {
            id: new.id,
            name: new.name,
            password: new.password,
            folders: Vec::new(),
        }
    }
}
