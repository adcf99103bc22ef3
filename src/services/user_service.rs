use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::requests::{Credentials, Registration};
use crate::auth::{generate_jwt, hash_password, verify_password};
use crate::config::AppConfig;
use crate::database::models::user::normalize_email;
use crate::database::models::User;
use crate::database::{DatabaseError, UserStore};
use crate::error::{ApiError, ApiResult};

const INVALID_CREDENTIALS: &str = "Please provide valid credentials";
const USER_EXISTS: &str = "User already exists";

/// Registration, login and identity lookup
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    config: Arc<AppConfig>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, config: Arc<AppConfig>) -> Self {
        Self { users, config }
    }

    /// Create the account and return a token so the client is logged in
    pub async fn register(&self, input: Registration) -> ApiResult<String> {
        let email = normalize_email(&input.email);
        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(ApiError::validation_message(USER_EXISTS));
        }

        let hash = hash_password(input.password, self.config.security.bcrypt_cost).await?;
        let user = User::new(input.name, email, hash, input.avatar);

        match self.users.insert_user(&user).await {
            Ok(()) => {}
            // Lost a race with a concurrent registration for the same email
            Err(DatabaseError::Duplicate(_)) => return Err(ApiError::validation_message(USER_EXISTS)),
            Err(e) => return Err(e.into()),
        }

        info!("Registered user {}", user.id);
        Ok(generate_jwt(user.id, &self.config.security)?)
    }

    /// Exchange email and password for a token
    pub async fn login(&self, credentials: Credentials) -> ApiResult<String> {
        let email = normalize_email(&credentials.email);
        let Some(user) = self.users.find_user_by_email(&email).await? else {
            warn!("Login attempt for unknown email");
            return Err(ApiError::validation_message(INVALID_CREDENTIALS));
        };

        if !verify_password(credentials.password, user.password.clone()).await? {
            warn!("Login attempt with wrong password for user {}", user.id);
            return Err(ApiError::validation_message(INVALID_CREDENTIALS));
        }

        Ok(generate_jwt(user.id, &self.config.security)?)
    }

    pub async fn current_user(&self, user_id: Uuid) -> ApiResult<User> {
        self.users
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }
}
