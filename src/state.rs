use campus_records::{IdAllocator, PrefixTable, PrerequisitePolicy};
use sqlx::PgPool;

use crate::config::{CorsConfig, JwtConfig, RegistryConfig};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub registry_config: RegistryConfig,
    pub allocator: IdAllocator,
}

impl AppState {
    pub fn new(db: PgPool, jwt_config: JwtConfig, cors_config: CorsConfig) -> Self {
        Self {
            db,
            jwt_config,
            cors_config,
            registry_config: RegistryConfig::default(),
            allocator: IdAllocator::new(PrefixTable::standard()),
        }
    }

    pub fn with_registry_config(mut self, registry_config: RegistryConfig) -> Self {
        self.registry_config = registry_config;
        self
    }

    pub fn prerequisite_policy(&self) -> PrerequisitePolicy {
        PrerequisitePolicy {
            reject_cycles: self.registry_config.reject_prerequisite_cycles,
        }
    }
}

pub async fn init_app_state() -> AppState {
    let db = campus_db::init_db_pool().await;

    AppState::new(db, JwtConfig::from_env(), CorsConfig::from_env())
        .with_registry_config(RegistryConfig::from_env())
}
