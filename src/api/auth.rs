use reqwest::Method;
use serde_json::{json, Value};

use super::client::{ensure_success, ApiClient, RequestOptions};
use crate::error::ApiError;
use crate::types::StatusReply;

impl ApiClient {
    /// Log in. The backend answers with a `token` cookie, which the client
    /// keeps and returns.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<String>, ApiError> {
        let _: Value = self
            .post("/auth/login", &json!({ "username": username, "password": password }))
            .await?;

        let token = self.session_token();
        if token.is_none() {
            tracing::warn!("Login succeeded but no session cookie was set");
        }
        Ok(token)
    }

    /// Ask for a reset email. The backend answers the same whether or not
    /// the address exists.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ApiError> {
        let _: Value = self.post("/auth/reset-password", &json!({ "email": email })).await?;
        Ok(())
    }

    /// Set a new password using the emailed reset token
    pub async fn reset_password(&self, token: &str, password: &str) -> Result<String, ApiError> {
        let reply: StatusReply = self
            .post("/auth/resetPassword", &json!({ "token": token, "password": password }))
            .await?;
        ensure_success(reply, "Error updating the password")
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<String, ApiError> {
        let reply: StatusReply = self
            .post(
                "/auth/register",
                &json!({ "username": username, "email": email, "password": password }),
            )
            .await?;
        ensure_success(reply, "Error registering user")
    }

    /// Confirm a registration from the emailed activation token
    pub async fn confirm_registration(&self, token: &str) -> Result<String, ApiError> {
        let reply: StatusReply = self
            .request(Method::GET, "/auth/register", RequestOptions::new().query("token", token))
            .await?;
        ensure_success(reply, "Error confirming user")
    }
}
