//! Resolve a folder or request by id and confirm it belongs to the caller.
//!
//! One generic routine serves every entity kind: parse the id, fetch at the
//! requested depth, fail if missing, fail if the owning user differs. Handlers
//! receive the entity itself, so nothing is fetched twice.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::database::models::{Folder, Owned, Request};
use crate::database::{Store, StoreError};
use crate::types::{Depth, EntityId};

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("invalid {kind} id '{raw}'")]
    InvalidId { kind: &'static str, raw: String },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: EntityId },

    #[error("{kind} {id} is owned by another user")]
    Ownership { kind: &'static str, id: EntityId },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An owned entity the guard knows how to fetch
#[async_trait]
pub trait Resolvable: Owned + Sized + Send + 'static {
    /// Name used in errors and logs
    const KIND: &'static str;

    async fn fetch(store: &dyn Store, id: EntityId, depth: Depth) -> Result<Option<Self>, StoreError>;
}

#[async_trait]
impl Resolvable for Folder {
    const KIND: &'static str = "folder";

    async fn fetch(store: &dyn Store, id: EntityId, depth: Depth) -> Result<Option<Self>, StoreError> {
        store.find_folder(id, depth).await
    }
}

#[async_trait]
impl Resolvable for Request {
    const KIND: &'static str = "request";

    async fn fetch(store: &dyn Store, id: EntityId, depth: Depth) -> Result<Option<Self>, StoreError> {
        store.find_request(id, depth).await
    }
}

/// Caller-supplied ids are unsigned 32-bit integers. Besides plain decimal,
/// `0x`, `0o` and `0b` prefixes are accepted, and a leading `0` means octal.
pub fn parse_id(kind: &'static str, raw: &str) -> Result<EntityId, AccessError> {
    let (radix, digits) = split_radix(raw);
    if digits.starts_with('+') {
        return Err(invalid_id(kind, raw));
    }
    u32::from_str_radix(digits, radix)
        .map(EntityId::from)
        .map_err(|_| invalid_id(kind, raw))
}

fn split_radix(raw: &str) -> (u32, &str) {
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = raw.strip_prefix(prefix) {
            return (radix, digits);
        }
    }
    match raw.strip_prefix('0') {
        Some(digits) if !digits.is_empty() => (8, digits),
        _ => (10, raw),
    }
}

fn invalid_id(kind: &'static str, raw: &str) -> AccessError {
    AccessError::InvalidId {
        kind,
        raw: raw.to_string(),
    }
}

pub struct OwnershipGuard {
    store: Arc<dyn Store>,
}

impl OwnershipGuard {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Resolve from a raw id as it arrived on the wire
    pub async fn resolve<T: Resolvable>(&self, caller: &str, raw_id: &str, depth: Depth) -> Result<T, AccessError> {
        let id = parse_id(T::KIND, raw_id)?;
        self.resolve_id(caller, id, depth).await
    }

    /// Resolve from an id already decoded from a body
    pub async fn resolve_id<T: Resolvable>(&self, caller: &str, id: EntityId, depth: Depth) -> Result<T, AccessError> {
        let entity = T::fetch(self.store.as_ref(), id, depth)
            .await?
            .ok_or(AccessError::NotFound { kind: T::KIND, id })?;

        if entity.owner_id() != caller {
            warn!("Ownership denied: user '{}' addressed {} {}", caller, T::KIND, id);
            return Err(AccessError::Ownership { kind: T::KIND, id });
        }
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{HttpMethod, NewParameter, NewUser, ParamKind, RequestDraft, Scheme};
    use crate::database::MemoryStore;

    async fn setup() -> (OwnershipGuard, Folder, Request) {
        let store = Arc::new(MemoryStore::new());
        for id in ["alice", "bob"] {
            store
                .create_user(NewUser {
                    id: id.into(),
                    name: id.into(),
                    password: "pw".into(),
                })
                .await
                .unwrap();
        }
        let folder = store.create_folder("alice", "Work").await.unwrap();
        let request = store
            .create_request(
                "alice",
                RequestDraft {
                    folder_id: folder.id,
                    name: "ping".into(),
                    url: "example.com".into(),
                    protocol_header: Scheme::Http,
                    method: HttpMethod::Get,
                    parameters: vec![NewParameter {
                        kind: ParamKind::Query,
                        key: "q".into(),
                        value: "1".into(),
                    }],
                },
            )
            .await
            .unwrap();
        (OwnershipGuard::new(store), folder, request)
    }

    #[test]
    fn parses_unsigned_ids_only() {
        assert_eq!(parse_id("folder", "42").unwrap(), 42);
        assert_eq!(parse_id("folder", "4294967295").unwrap(), 4_294_967_295);
        for bad in ["", "-1", "+1", " 7", "abc", "4294967296", "1.5", "0x", "08", "0b2"] {
            assert!(matches!(parse_id("folder", bad), Err(AccessError::InvalidId { .. })), "{bad}");
        }
    }

    #[test]
    fn parses_base_prefixed_ids() {
        assert_eq!(parse_id("request", "0x10").unwrap(), 16);
        assert_eq!(parse_id("request", "0XfF").unwrap(), 255);
        assert_eq!(parse_id("request", "0o17").unwrap(), 15);
        assert_eq!(parse_id("request", "017").unwrap(), 15);
        assert_eq!(parse_id("request", "0b101").unwrap(), 5);
        assert_eq!(parse_id("request", "0").unwrap(), 0);
        assert_eq!(parse_id("request", "0xffffffff").unwrap(), 4_294_967_295);
    }

    #[tokio::test]
    async fn owner_resolves_entity() {
        let (guard, folder, request) = setup().await;
        let found: Folder = guard.resolve("alice", &folder.id.to_string(), Depth::WithChildren).await.unwrap();
        assert_eq!(found.requests.len(), 1);

        let found: Request = guard.resolve_id("alice", request.id, Depth::WithChildren).await.unwrap();
        assert_eq!(found.parameters.len(), 1);
        let found: Request = guard.resolve_id("alice", request.id, Depth::Shallow).await.unwrap();
        assert!(found.parameters.is_empty());
    }

    #[tokio::test]
    async fn non_owner_is_denied() {
        let (guard, folder, request) = setup().await;
        let err = guard.resolve_id::<Folder>("bob", folder.id, Depth::Shallow).await.unwrap_err();
        assert!(matches!(err, AccessError::Ownership { kind: "folder", .. }));
        let err = guard.resolve_id::<Request>("bob", request.id, Depth::WithChildren).await.unwrap_err();
        assert!(matches!(err, AccessError::Ownership { kind: "request", .. }));
    }

    #[tokio::test]
    async fn missing_and_malformed_ids() {
        let (guard, _, _) = setup().await;
        let err = guard.resolve::<Folder>("alice", "999", Depth::Shallow).await.unwrap_err();
        assert!(matches!(err, AccessError::NotFound { id: 999, .. }));
        let err = guard.resolve::<Request>("alice", "x1", Depth::Shallow).await.unwrap_err();
        assert!(matches!(err, AccessError::InvalidId { kind: "request", .. }));
    }
}
