use std::sync::Arc;

use regionmap_shared::RegisteredMap;

#[derive(Debug, Clone)]
pub struct AppState {
    /// The dataset bundled into the client, registered once at startup.
    pub map: Arc<RegisteredMap>,
}

impl AppState {
    pub fn new(map: Arc<RegisteredMap>) -> Self {
        Self { map }
    }
}
