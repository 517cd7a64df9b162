use serde_json::Value;

use super::client::ApiClient;
use crate::error::ApiError;
use crate::types::{NewUserPayload, User, UserId, UserUpdatePayload};

impl ApiClient {
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.get("/user").await
    }

    pub async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        self.get(&format!("/user/{}", id)).await
    }

    pub async fn create_user(&self, payload: &NewUserPayload) -> Result<(), ApiError> {
        let _: Value = self.post("/user", payload).await?;
        tracing::info!("Created user '{}' with {} role(s)", payload.username, payload.roles.len());
        Ok(())
    }

    pub async fn update_user(&self, id: UserId, payload: &UserUpdatePayload) -> Result<(), ApiError> {
        let _: Value = self.put(&format!("/user/{}", id), payload).await?;
        tracing::info!("Updated user {}", id);
        Ok(())
    }

    pub async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let _: Value = self.delete(&format!("/user/{}", id)).await?;
        tracing::info!("Deleted user {}", id);
        Ok(())
    }
}
