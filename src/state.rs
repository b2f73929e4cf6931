use std::sync::Arc;

use crate::auth::CredentialVerifier;
use crate::database::Store;
use crate::services::OwnershipGuard;

/// Shared components, built once at startup and cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub verifier: Arc<CredentialVerifier>,
    pub guard: Arc<OwnershipGuard>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, verifier: CredentialVerifier) -> Self {
        Self {
            guard: Arc::new(OwnershipGuard::new(store.clone())),
            verifier: Arc::new(verifier),
            store,
        }
    }
}
