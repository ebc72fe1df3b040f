//! Auth service.

use std::sync::Arc;

use async_trait::async_trait;
use marketplace::actors::Actor;
use mockall::automock;

use crate::{
    auth::{AuthServiceError, check_session_token, hash_session_token},
    domain::directory::DirectoryRepository,
};

#[derive(Clone)]
pub struct SessionAuthService {
    directory: Arc<dyn DirectoryRepository>,
}

impl SessionAuthService {
    #[must_use]
    pub fn new(directory: Arc<dyn DirectoryRepository>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl AuthService for SessionAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Actor, AuthServiceError> {
        check_session_token(bearer_token)?;

        self.directory
            .find_actor_by_session(&hash_session_token(bearer_token))
            .await?
            .ok_or(AuthServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the actor it belongs to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Actor, AuthServiceError>;
}
