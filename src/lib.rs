pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod forms;
pub mod tree;
pub mod types;

pub use api::ApiClient;
pub use config::{AppConfig, ClientConfig};
pub use error::ApiError;
pub use tree::{build_tree, ExpansionState, PermissionNode, SelectionState};
pub use types::PermissionRecord;
