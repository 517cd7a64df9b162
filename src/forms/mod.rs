//! Client-side checks run before anything is sent to the backend.

use thiserror::Error;

use crate::tree::SelectionState;
use crate::types::{NewUserPayload, RolePayload, UserUpdatePayload};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Role name is required")]
    RoleNameRequired,

    #[error("Username is required")]
    UsernameRequired,

    #[error("Email is required")]
    EmailRequired,

    #[error("Email format is not valid")]
    InvalidEmail,

    #[error("Password is required")]
    PasswordRequired,

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Please fill in both password fields")]
    PasswordFieldsMissing,

    #[error("Reset token is invalid or missing")]
    TokenMissing,
}

/// Role create/edit form
#[derive(Debug, Clone, Default)]
pub struct RoleForm {
    pub name: String,
    pub accesses: SelectionState,
}

impl RoleForm {
    pub fn new(name: impl Into<String>, accesses: SelectionState) -> Self {
        Self {
            name: name.into(),
            accesses,
        }
    }

    pub fn to_payload(&self) -> Result<RolePayload, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::RoleNameRequired);
        }

        Ok(RolePayload {
            name: name.to_string(),
            accesses: self.accesses.to_id_refs(),
        })
    }
}

/// New user form; roles are picked with the same toggle semantics as accesses
#[derive(Debug, Clone, Default)]
pub struct NewUserForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub roles: SelectionState,
}

impl NewUserForm {
    pub fn to_payload(&self) -> Result<NewUserPayload, ValidationError> {
        let username = self.username.trim();
        let email = self.email.trim();

        if username.is_empty() {
            return Err(ValidationError::UsernameRequired);
        }
        if email.is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        if self.password.trim().is_empty() {
            return Err(ValidationError::PasswordRequired);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }

        Ok(NewUserPayload {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            roles: self.roles.to_id_refs(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserUpdateForm {
    pub username: String,
    pub email: String,
}

impl UserUpdateForm {
    pub fn to_payload(&self) -> Result<UserUpdatePayload, ValidationError> {
        let username = self.username.trim();
        let email = self.email.trim();

        if username.is_empty() {
            return Err(ValidationError::UsernameRequired);
        }
        if email.is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail);
        }

        Ok(UserUpdatePayload {
            username: username.to_string(),
            email: email.to_string(),
        })
    }
}

/// Password reset completion; the token comes from the emailed link
#[derive(Debug, Clone, Default)]
pub struct NewPasswordForm {
    pub token: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

impl NewPasswordForm {
    /// Returns `(token, password)` ready to post
    pub fn validate(&self) -> Result<(String, String), ValidationError> {
        if self.password.is_empty() || self.confirm_password.is_empty() {
            return Err(ValidationError::PasswordFieldsMissing);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok((token.to_string(), self.password.clone())),
            _ => Err(ValidationError::TokenMissing),
        }
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // needs a dot with something on both sides
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
