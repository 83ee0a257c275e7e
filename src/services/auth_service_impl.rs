//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::Config;
use crate::db::Store;
use crate::domain::{Role, UserId};
use crate::models::user::User;
use crate::services::auth_service::{AuthError, AuthService, AuthSession, normalize_email};

pub struct SeaOrmAuthService {
    store: Store,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email);

        if self.store.get_user_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let security = self.config.read().await.security.clone();
        let user = self
            .store
            .create_user(name.trim(), &email, password, Role::User, &security)
            .await?;

        info!("Registered user {} ({})", user.id, user.email);
        Ok(AuthSession::from(user))
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let email = normalize_email(email);

        let user = self
            .store
            .verify_user_password(&email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        Ok(AuthSession::from(user))
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>, AuthError> {
        Ok(self.store.verify_api_key(api_key).await?)
    }

    async fn get_user(&self, id: UserId) -> Result<User, AuthError> {
        self.store.get_user(id).await?.ok_or(AuthError::UserNotFound)
    }

    async fn regenerate_api_key(&self, id: UserId) -> Result<String, AuthError> {
        let new_api_key = self.store.regenerate_user_api_key(id).await?;
        info!("API key regenerated for user {id}");
        Ok(new_api_key)
    }
}
