use crate::chat::SessionStore;
use crate::providers::gateway::ProviderGateway;
use std::sync::Arc;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub gateway: Arc<ProviderGateway>,
}

impl AppState {
    pub fn new(gateway: ProviderGateway, sessions: SessionStore) -> Self {
        Self {
            sessions: Arc::new(sessions),
            gateway: Arc::new(gateway),
        }
    }
}
