use std::sync::Arc;
use tracing::info;

use crate::models::user::User;
use crate::repositories::errors::user_repository_errors::UserRepositoryError;
use crate::repositories::user_repository::UserRepository;
use crate::services::errors::user_service_errors::UserServiceError;

pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>) -> Self {
        UserService { repository }
    }

    pub async fn create_user(&self, id: &str, name: &str) -> Result<User, UserServiceError> {
        let name = name.trim();
        if id.is_empty() || name.is_empty() {
            return Err(UserServiceError::ValidationError(
                "User ID or name cannot be empty".to_string(),
            ));
        }
        let user = User::new(id.to_string(), name.to_string());
        self.repository
            .create_user(&user)
            .await
            .map_err(|e| UserServiceError::RepositoryError(e.to_string()))?;
        info!("User created: {}", user.id);
        Ok(user)
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> Result<User, UserServiceError> {
        if user_id.is_empty() {
            return Err(UserServiceError::ValidationError(
                "User ID cannot be empty".to_string(),
            ));
        }
        self.repository
            .get_user_by_id(user_id)
            .await
            .map_err(|e| match e {
                UserRepositoryError::NotFound => UserServiceError::UserNotFound,
                _ => UserServiceError::RepositoryError(e.to_string()),
            })
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserServiceError> {
        self.repository
            .list_users()
            .await
            .map_err(|e| UserServiceError::RepositoryError(e.to_string()))
    }
}
