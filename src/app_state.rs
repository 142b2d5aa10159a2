use std::sync::Arc;

use crate::config::ProviderKind;
use crate::services::enhancer::Enhancer;

/// Shared application state passed to route handlers. The enhancer holds no
/// cross-request resources, so no locking is involved.
#[derive(Clone)]
pub struct AppState {
    pub enhancer: Arc<Enhancer>,
    pub provider_kind: ProviderKind,
}

impl AppState {
    pub fn new(enhancer: Enhancer, provider_kind: ProviderKind) -> Self {
        Self {
            enhancer: Arc::new(enhancer),
            provider_kind,
        }
    }
}
