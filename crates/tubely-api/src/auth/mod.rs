pub mod jwt;
pub mod middleware;
pub mod models;

pub use jwt::JwtAuthenticator;
pub use models::{AuthUser, JwtClaims};
