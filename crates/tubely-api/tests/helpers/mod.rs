//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p tubely-api`. Everything runs in
//! process: memory storage, in-memory records and fake media tools.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;
pub mod media;

use std::path::Path;
use std::sync::Arc;

use axum_test::TestServer;
use tempfile::TempDir;
use tubely_api::constants;
use tubely_api::setup::routes;
use tubely_api::state::AppState;
use tubely_core::config::TubelyConfig;
use tubely_core::{Config, Video};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_storage::{MemoryStorage, Storage};

use media::{FakeProbe, FakeRemuxer};

/// Public URL base of the test storage.
pub const TEST_STORAGE_BASE_URL: &str = "https://cdn.tubely.test";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, shared collaborators and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<MemoryStorage>,
    pub repository: Arc<InMemoryVideoRepository>,
    pub probe: Arc<FakeProbe>,
    pub remuxer: Arc<FakeRemuxer>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn temp_dir(&self) -> &Path {
        self._temp_dir.path()
    }

    /// Number of entries left in the upload temp dir.
    pub fn leftover_files(&self) -> usize {
        std::fs::read_dir(self.temp_dir())
            .expect("Failed to read temp dir")
            .count()
    }

    /// Seed a record owned by `owner`.
    pub async fn create_video(&self, owner: uuid::Uuid) -> Video {
        self.repository
            .create_video(Video::new(owner, "test video"))
            .await
            .expect("Failed to create video record")
    }

    pub async fn stored_video(&self, id: uuid::Uuid) -> Video {
        self.repository
            .get_video(id)
            .await
            .expect("Failed to read video record")
            .expect("Video record missing")
    }

    /// Download the object behind a public URL returned by the API.
    pub async fn download(&self, url: &str) -> Vec<u8> {
        let key = url
            .strip_prefix(&format!("{}/", TEST_STORAGE_BASE_URL))
            .expect("URL not served by test storage");
        self.storage.download(key).await.expect("Object missing")
    }
}

/// Test app whose probe reports 1920x1080.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(FakeProbe::reporting(1920, 1080), |_| {}).await
}

/// Test app with a custom probe and config tweaks.
pub async fn setup_test_app_with(
    probe: FakeProbe,
    configure: impl FnOnce(&mut TubelyConfig),
) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

    let mut config = TubelyConfig::in_memory(auth::TEST_JWT_SECRET);
    config.environment = "test".to_string();
    config.memory_storage_base_url = TEST_STORAGE_BASE_URL.to_string();
    config.upload_temp_dir = Some(temp_dir.path().to_path_buf());
    configure(&mut config);
    let config = Config(Box::new(config));
    config.validate().expect("Invalid test config");

    let storage = Arc::new(MemoryStorage::new(TEST_STORAGE_BASE_URL));
    let repository = Arc::new(InMemoryVideoRepository::new());
    let probe = Arc::new(probe);
    let remuxer = Arc::new(FakeRemuxer::default());

    let state = Arc::new(AppState::with_media_tools(
        config.clone(),
        storage.clone(),
        repository.clone(),
        probe.clone(),
        remuxer.clone(),
    ));

    let app = routes::setup_routes(&config, state);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        repository,
        probe,
        remuxer,
        _temp_dir: temp_dir,
    }
}
