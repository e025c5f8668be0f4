use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use serde::Serialize;
use tokio::task;

use crate::config::SecurityConfig;
use crate::db::is_unique_violation;
use crate::domain::now_timestamp;
use crate::entities::{password_resets, users};

/// User profile returned from repository (without the password hash)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// Best human-readable label: full name, then name, then email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            full_name: model.full_name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a profile row. Returns `None` when the email is already taken.
    pub async fn create(
        &self,
        email: &str,
        full_name: Option<&str>,
        password_hash: String,
    ) -> Result<Option<User>> {
        let now = now_timestamp();
        let active = users::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            email: Set(email.to_string()),
            name: Set(full_name.map(str::to_string)),
            full_name: Set(full_name.map(str::to_string)),
            password_hash: Set(password_hash),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(User::from(model))),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e).context("Failed to insert user"),
        }
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    pub async fn list_all(&self) -> Result<Vec<User>> {
        let rows = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    /// Verify password for a user; returns the user on success.
    /// Note: Argon2 runs in `spawn_blocking` to keep it off the async workers.
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user for password verification")?;

        let Some(user) = user else {
            return Ok(None);
        };

        let password_hash = user.password_hash.clone();
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid.then(|| User::from(user)))
    }

    pub async fn update_password(
        &self,
        user_id: &str,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<()> {
        let user = users::Entity::find_by_id(user_id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query user for password update")?
            .ok_or_else(|| anyhow::anyhow!("User not found: {user_id}"))?;

        let password = new_password.to_string();
        let config = config.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .context("Password hashing task panicked")??;

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(now_timestamp());
        active.update(&self.conn).await?;

        Ok(())
    }

    /// Stores a single-use reset token valid for `ttl_minutes` and returns it.
    pub async fn create_reset_token(&self, user_id: &str, ttl_minutes: i64) -> Result<String> {
        let token = generate_token();
        let expires_at = (chrono::Utc::now() + chrono::Duration::minutes(ttl_minutes))
            .to_rfc3339_opts(chrono::SecondsFormat::Micros, true);

        let active = password_resets::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            token: Set(token.clone()),
            expires_at: Set(expires_at),
            used_at: Set(None),
            created_at: Set(now_timestamp()),
        };
        active
            .insert(&self.conn)
            .await
            .context("Failed to store password reset token")?;

        Ok(token)
    }

    /// Marks an unused, unexpired token as used and returns its user id.
    ///
    /// The conditional update makes redemption single-use even when two
    /// requests race on the same link.
    pub async fn redeem_reset_token(&self, token: &str) -> Result<Option<String>> {
        let now = now_timestamp();

        let result = password_resets::Entity::update_many()
            .col_expr(password_resets::Column::UsedAt, Expr::value(now.clone()))
            .filter(password_resets::Column::Token.eq(token))
            .filter(password_resets::Column::UsedAt.is_null())
            .filter(password_resets::Column::ExpiresAt.gt(now))
            .exec(&self.conn)
            .await
            .context("Failed to redeem password reset token")?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let row = password_resets::Entity::find()
            .filter(password_resets::Column::Token.eq(token))
            .one(&self.conn)
            .await
            .context("Failed to load redeemed reset token")?;

        Ok(row.map(|r| r.user_id))
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the crate's default params.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Generate a random token (64 character hex string)
#[must_use]
pub fn generate_token() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}
