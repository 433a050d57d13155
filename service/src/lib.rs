use crate::auth::TokenVerifier;
use config::Config;
use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod logging;

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub hub: Arc<hub::Manager>,
    pub event_publisher: events::EventPublisher,
    pub token_verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    pub fn new(
        config: Config,
        hub: Arc<hub::Manager>,
        event_publisher: events::EventPublisher,
        token_verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            config,
            hub,
            event_publisher,
            token_verifier,
        }
    }

    pub fn hub_ref(&self) -> &hub::Manager {
        self.hub.as_ref()
    }
}
