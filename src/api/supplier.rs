use reqwest::Method;
use serde_json::Value;

use super::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Suppliers are served as free-form records and authorize by bearer token
    pub async fn list_suppliers(&self) -> Result<Vec<Value>, ApiError> {
        self.request(Method::GET, "/suppliers", self.bearer_options()).await
    }
}
