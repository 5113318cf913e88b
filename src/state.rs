use crate::observability::metrics::Metrics;
use crate::store::{ParcelStore, UserDirectory};

pub struct AppState {
    pub parcels: ParcelStore,
    pub users: UserDirectory,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            parcels: ParcelStore::new(),
            users: UserDirectory::new(),
            metrics: Metrics::new(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
