use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::models::{
    Folder, NewParameter, NewUser, Parameter, Request, RequestContent, RequestDraft, User,
};
use crate::database::store::{Store, StoreError};
use crate::types::{Depth, EntityId};

/// In-process store for development and tests.
///
/// All tables sit behind one lock, so each trait call is atomic the same
/// way a single Postgres transaction is.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<String, User>,
    folders: BTreeMap<EntityId, Folder>,
    requests: BTreeMap<EntityId, Request>,
    parameters: BTreeMap<EntityId, Parameter>,
    last_id: EntityId,
}

impl Tables {
    fn next_id(&mut self) -> EntityId {
        self.last_id += 1;
        self.last_id
    }

    fn insert_parameters(&mut self, request_id: EntityId, params: Vec<NewParameter>) -> Vec<Parameter> {
        params
            .into_iter()
            .map(|p| {
                let param = Parameter {
                    id: self.next_id(),
                    kind: p.kind,
                    key: p.key,
                    value: p.value,
                    request_id,
                };
                self.parameters.insert(param.id, param.clone());
                param
            })
            .collect()
    }

    fn parameters_of(&self, request_id: EntityId) -> Vec<Parameter> {
        self.parameters
            .values()
            .filter(|p| p.request_id == request_id)
            .cloned()
            .collect()
    }

    fn requests_of(&self, folder_id: EntityId, with_parameters: bool) -> Vec<Request> {
        self.requests
            .values()
            .filter(|r| r.folder_id == folder_id)
            .map(|r| {
                let mut request = r.clone();
                if with_parameters {
                    request.parameters = self.parameters_of(r.id);
                }
                request
            })
            .collect()
    }

    fn remove_request(&mut self, id: EntityId) {
        self.parameters.retain(|_, p| p.request_id != id);
        self.requests.remove(&id);
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing(kind: &str, id: impl std::fmt::Display) -> StoreError {
    StoreError::NotFound(format!("{} {}", kind, id))
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) {
            return Err(StoreError::Conflict(format!("user '{}' already exists", user.id)));
        }
        let user = User::from(user);
        tables.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: &str, depth: Depth) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        let Some(user) = tables.users.get(id) else {
            return Ok(None);
        };
        let mut user = user.clone();
        if depth.loads_children() {
            user.folders = tables
                .folders
                .values()
                .filter(|f| f.user_id == id)
                .map(|f| Folder {
                    requests: tables.requests_of(f.id, true),
                    ..f.clone()
                })
                .collect();
        }
        Ok(Some(user))
    }

    async fn rename_user(&self, id: &str, name: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(id).ok_or_else(|| missing("user", id))?;
        user.name = name.to_string();
        Ok(())
    }

    async fn create_folder(&self, owner: &str, name: &str) -> Result<Folder, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(owner) {
            return Err(missing("user", owner));
        }
        let folder = Folder {
            id: tables.next_id(),
            name: name.to_string(),
            user_id: owner.to_string(),
            requests: Vec::new(),
        };
        tables.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn find_folder(&self, id: EntityId, depth: Depth) -> Result<Option<Folder>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.folders.get(&id).map(|f| {
            let mut folder = f.clone();
            if depth.loads_children() {
                folder.requests = tables.requests_of(id, false);
            }
            folder
        }))
    }

    async fn rename_folder(&self, id: EntityId, name: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let folder = tables.folders.get_mut(&id).ok_or_else(|| missing("folder", id))?;
        folder.name = name.to_string();
        Ok(())
    }

    async fn delete_folder(&self, id: EntityId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.folders.contains_key(&id) {
            return Err(missing("folder", id));
        }
        let contained: Vec<EntityId> = tables
            .requests
            .values()
            .filter(|r| r.folder_id == id)
            .map(|r| r.id)
            .collect();
        for request_id in contained {
            tables.remove_request(request_id);
        }
        tables.folders.remove(&id);
        Ok(())
    }

    async fn create_request(&self, owner: &str, draft: RequestDraft) -> Result<Request, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.folders.contains_key(&draft.folder_id) {
            return Err(missing("folder", draft.folder_id));
        }
        let id = tables.next_id();
        let parameters = tables.insert_parameters(id, draft.parameters);
        let request = Request {
            id,
            folder_id: draft.folder_id,
            user_id: owner.to_string(),
            name: draft.name,
            url: draft.url,
            protocol_header: draft.protocol_header,
            method: draft.method,
            result: String::new(),
            parameters: Vec::new(),
        };
        tables.requests.insert(id, request.clone());
        Ok(Request { parameters, ..request })
    }

    async fn find_request(&self, id: EntityId, depth: Depth) -> Result<Option<Request>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.requests.get(&id).map(|r| {
            let mut request = r.clone();
            if depth.loads_children() {
                request.parameters = tables.parameters_of(id);
            }
            request
        }))
    }

    async fn update_request(&self, id: EntityId, content: RequestContent) -> Result<Request, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.requests.contains_key(&id) {
            return Err(missing("request", id));
        }
        tables.parameters.retain(|_, p| p.request_id != id);
        let parameters = tables.insert_parameters(id, content.parameters);
        let request = tables.requests.get_mut(&id).ok_or_else(|| missing("request", id))?;
        request.url = content.url;
        request.protocol_header = content.protocol_header;
        request.method = content.method;
        request.result = content.result;
        Ok(Request {
            parameters,
            ..request.clone()
        })
    }

    async fn rename_request(&self, id: EntityId, name: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let request = tables.requests.get_mut(&id).ok_or_else(|| missing("request", id))?;
        request.name = name.to_string();
        Ok(())
    }

    async fn move_request(&self, id: EntityId, folder_id: EntityId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.folders.contains_key(&folder_id) {
            return Err(missing("folder", folder_id));
        }
        let request = tables.requests.get_mut(&id).ok_or_else(|| missing("request", id))?;
        request.folder_id = folder_id;
        Ok(())
    }

    async fn delete_request(&self, id: EntityId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.requests.contains_key(&id) {
            return Err(missing("request", id));
        }
        tables.remove_request(id);
        Ok(())
    }
}
