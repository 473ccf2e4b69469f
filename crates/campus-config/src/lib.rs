//! # Campus Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: allowed browser origins
//! - [`registry`]: records rules such as the prerequisite cycle policy
//!
//! ```ignore
//! use campus_config::{CorsConfig, JwtConfig, RegistryConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let registry_config = RegistryConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod registry;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use registry::RegistryConfig;

/// Interprets common truthy/falsy spellings. Anything else is `None`.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
