//! Configuration loaded from environment variables.
//!
//! - `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`: see `campus_db`
//! - `JWT_SECRET`, `JWT_ACCESS_EXPIRY`: [`JwtConfig`]
//! - `ALLOWED_ORIGINS`: [`CorsConfig`]
//! - `PREREQUISITE_REJECT_CYCLES`: [`RegistryConfig`]
//! - `PORT`: listening port, default 3000

pub use campus_config::{CorsConfig, JwtConfig, RegistryConfig};

pub const DEFAULT_PORT: u16 = 3000;

pub fn port_from_env() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}
