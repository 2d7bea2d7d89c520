//! Test helpers: build AppState and router for integration tests.
//!
//! Storage is replaced by in-memory [`MockStorage`] buckets so the full HTTP
//! surface runs without a provider. Run with `cargo test -p resizer-api`.

#![allow(dead_code)]

pub mod fixtures;
pub mod mock_storage;

use axum_test::TestServer;
use mock_storage::MockStorage;
use resizer_api::setup::routes;
use resizer_api::state::AppState;
use resizer_core::Config;
use resizer_storage::Storage;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const UPLOAD_BUCKET: &str = "originals";
pub const DERIVATIVE_BUCKET: &str = "public";

/// Configuration with test buckets and defaults for everything else.
pub fn test_config() -> Config {
    test_config_with(&[])
}

/// Configuration with extra variables layered over the test defaults.
pub fn test_config_with(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("S3_BUCKET_NAME".to_string(), UPLOAD_BUCKET.to_string()),
        (
            "S3_DOWNLOAD_BUCKET_NAME".to_string(),
            DERIVATIVE_BUCKET.to_string(),
        ),
        ("ENVIRONMENT".to_string(), "test".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config must be valid")
}

/// Test application: server plus direct handles on both buckets.
pub struct TestApp {
    pub server: TestServer,
    pub uploads: Arc<MockStorage>,
    pub derivatives: Arc<MockStorage>,
    /// Private `SCRATCH_DIR`, set by [`setup_test_app`].
    pub scratch: Option<TempDir>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Entries left behind in the scratch root.
    pub fn scratch_entries(&self) -> usize {
        let scratch = self
            .scratch
            .as_ref()
            .expect("app was built without a private scratch directory");
        count_entries(scratch.path())
    }
}

pub fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .expect("Failed to read scratch directory")
        .count()
}

/// Default test app with its own scratch root.
pub fn setup_test_app() -> TestApp {
    let scratch = TempDir::new().expect("Failed to create scratch directory");
    let scratch_path = scratch.path().to_string_lossy().into_owned();
    let config = test_config_with(&[("SCRATCH_DIR", scratch_path.as_str())]);

    TestApp {
        scratch: Some(scratch),
        ..setup_test_app_with_config(config)
    }
}

pub fn setup_test_app_with_config(config: Config) -> TestApp {
    let uploads = Arc::new(MockStorage::new(config.upload_bucket()));
    let derivatives = Arc::new(MockStorage::new(config.derivative_bucket()));
    let server = build_server(config, uploads.clone(), derivatives.clone());

    TestApp {
        server,
        uploads,
        derivatives,
        scratch: None,
    }
}

/// Serve the real router over arbitrary storage handles.
pub fn build_server(
    config: Config,
    upload_storage: Arc<dyn Storage>,
    derivative_storage: Arc<dyn Storage>,
) -> TestServer {
    let state = Arc::new(AppState::new(
        config.clone(),
        upload_storage,
        derivative_storage,
    ));
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    TestServer::new(app.into_make_service()).expect("Failed to create test server")
}
