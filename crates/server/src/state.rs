use std::sync::Arc;

use service::DataStore;

#[derive(Clone)]
pub struct ServerState {
    pub store: Arc<DataStore>,
}

impl ServerState {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }
}
