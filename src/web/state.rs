//! Shared application state for the web API.

use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::service::RegistryService;

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub service: Arc<RegistryService>,
}

impl AppState {
    pub fn new(config: ServiceConfig, service: RegistryService) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }
}
