use serde_json::Value;

use super::client::{ensure_success, ApiClient};
use crate::error::ApiError;
use crate::types::{PermissionRecord, Role, RoleId, RolePayload, StatusReply};

impl ApiClient {
    pub async fn list_roles(&self) -> Result<Vec<Role>, ApiError> {
        self.get("/role").await
    }

    pub async fn get_role(&self, id: RoleId) -> Result<Role, ApiError> {
        self.get(&format!("/role/{}", id)).await
    }

    /// Flat permission list, to be assembled with `tree::build_tree`
    pub async fn list_permissions(&self) -> Result<Vec<PermissionRecord>, ApiError> {
        self.get("/role/access").await
    }

    pub async fn create_role(&self, payload: &RolePayload) -> Result<String, ApiError> {
        let reply: StatusReply = self.post("/role", payload).await?;
        let message = ensure_success(reply, "Error creating role")?;
        tracing::info!("Created role '{}' with {} access(es)", payload.name, payload.accesses.len());
        Ok(message)
    }

    pub async fn update_role(&self, id: RoleId, payload: &RolePayload) -> Result<(), ApiError> {
        let _: Value = self.put(&format!("/role/{}", id), payload).await?;
        tracing::info!("Updated role {} with {} access(es)", id, payload.accesses.len());
        Ok(())
    }

    pub async fn delete_role(&self, id: RoleId) -> Result<(), ApiError> {
        let _: Value = self.delete(&format!("/role/{}", id)).await?;
        tracing::info!("Deleted role {}", id);
        Ok(())
    }
}
