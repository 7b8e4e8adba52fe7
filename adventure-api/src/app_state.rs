use std::sync::Arc;

use url::Url;

use crate::domain::ports::inbound::GridService;

#[derive(Clone)]
pub struct AppState {
    pub app_url: Url,
    pub grid_service: Arc<dyn GridService>,
}

impl AppState {
    pub fn new(app_url: Url, grid_service: Arc<dyn GridService>) -> Self {
        Self {
            app_url,
            grid_service,
        }
    }
}
