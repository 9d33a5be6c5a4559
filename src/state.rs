use std::sync::Arc;
use crate::config::Config;
use crate::services::{Store, Templates};

// Application state shared between handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub templates: Templates,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = Store::open(&config.storage, &config.auth);
        let templates = Templates::new(&config.web.templates_dir);
        Self {
            store: Arc::new(store),
            templates,
            config: Arc::new(config),
        }
    }
}
