use thiserror::Error;

use crate::types::PermissionId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Permission {id} references unknown parent {parent_id}")]
    DanglingParent {
        id: PermissionId,
        parent_id: PermissionId,
    },

    #[error("Unknown orphan policy: {0}")]
    UnknownOrphanPolicy(String),
}
