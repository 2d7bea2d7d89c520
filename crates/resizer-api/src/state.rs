//! Application state
//!
//! Built once at startup. Storage handles are trait objects so tests can
//! substitute in-memory fakes.

use crate::services::{DerivativeGenerator, UploadAuthorizer};
use resizer_core::Config;
use resizer_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub upload_storage: Arc<dyn Storage>,
    pub derivative_storage: Arc<dyn Storage>,
    pub upload_authorizer: UploadAuthorizer,
    pub derivative_generator: DerivativeGenerator,
}

impl AppState {
    pub fn new(
        config: Config,
        upload_storage: Arc<dyn Storage>,
        derivative_storage: Arc<dyn Storage>,
    ) -> Self {
        let upload_authorizer =
            UploadAuthorizer::new(&config, upload_storage.clone(), derivative_storage.clone());
        let derivative_generator =
            DerivativeGenerator::new(&config, upload_storage.clone(), derivative_storage.clone());

        Self {
            config,
            upload_storage,
            derivative_storage,
            upload_authorizer,
            derivative_generator,
        }
    }
}
