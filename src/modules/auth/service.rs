use anyhow::anyhow;
use campus_auth::{Role, create_access_token};
use campus_config::JwtConfig;
use campus_core::{hash_password, verify_password};
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::modules::auth::model::{
    AUTO_REFERENCE, LoginRequest, LoginResponse, RegisterRequest, User, UserResponse,
};
use crate::utils::errors::{AppError, is_unique_violation};

/// Counter namespace for numeric user references.
const USER_REFERENCE_NAMESPACE: &str = "USERREF";

pub struct AuthService;

impl AuthService {
    /// Creates an ADMIN account and signs it in.
    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn register_user(
        db: &PgPool,
        dto: RegisterRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let reference_id = match dto.reference_id {
            Some(reference) if reference.eq_ignore_ascii_case(AUTO_REFERENCE) => {
                Some(Self::next_user_reference(db).await?)
            }
            other => other,
        };

        let password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO users (username, password, role, reference_id)
               VALUES ($1, $2, $3, $4)
               RETURNING username, password, role, reference_id"#,
        )
        .bind(&dto.username)
        .bind(&password)
        .bind(Role::Admin.as_str())
        .bind(&reference_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return AppError::conflict(anyhow!("Username already exists"));
            }
            AppError::from(e)
        })?;

        info!("User registered");
        Self::sign_in(user, jwt_config)
    }

    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let user = Self::find_user(db, &dto.username)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

        if !verify_password(&dto.password, &user.password)? {
            return Err(AppError::unauthorized("Invalid username or password"));
        }

        Self::sign_in(user, jwt_config)
    }

    #[instrument(skip(db))]
    pub async fn get_profile(db: &PgPool, username: &str) -> Result<UserResponse, AppError> {
        Self::find_user(db, username)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))
    }

    async fn find_user(db: &PgPool, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT username, password, role, reference_id FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    fn sign_in(user: User, jwt_config: &JwtConfig) -> Result<LoginResponse, AppError> {
        let access_token = create_access_token(
            &user.username,
            user.role(),
            user.reference_id.clone(),
            jwt_config,
        )?;

        Ok(LoginResponse {
            access_token,
            user: user.into(),
        })
    }

    /// Next numeric reference, kept above every numeric reference already stored.
    async fn next_user_reference(db: &PgPool) -> Result<String, AppError> {
        let value = sqlx::query_scalar::<_, i64>(
            r#"WITH existing AS (
                   SELECT COALESCE(MAX(CAST(reference_id AS BIGINT)), 0) AS floor
                   FROM users
                   WHERE reference_id ~ '^[0-9]{1,18}$'
               )
               INSERT INTO id_sequences (namespace, last_value)
               SELECT $1, floor + 1 FROM existing
               ON CONFLICT (namespace) DO UPDATE
               SET last_value = GREATEST(id_sequences.last_value, EXCLUDED.last_value - 1) + 1
               RETURNING last_value"#,
        )
        .bind(USER_REFERENCE_NAMESPACE)
        .fetch_one(db)
        .await?;

        Ok(value.to_string())
    }
}
