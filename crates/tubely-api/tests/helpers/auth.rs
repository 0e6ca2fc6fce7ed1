use chrono::Duration;
use tubely_api::JwtAuthenticator;
use uuid::Uuid;

/// JWT secret used by `setup_test_app`.
pub const TEST_JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";

/// A caller with a valid bearer token.
pub struct TestUser {
    pub user_id: Uuid,
    pub token: String,
}

impl TestUser {
    pub fn new() -> Self {
        let user_id = Uuid::new_v4();
        let token = JwtAuthenticator::new(TEST_JWT_SECRET)
            .issue(user_id, Duration::hours(1))
            .expect("Failed to sign test token");
        Self { user_id, token }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}
