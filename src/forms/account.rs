//! Account dialogs: password change and profile details.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Validate)]
pub struct ChangePasswordForm {
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangePasswordForm {
    /// Dialog validator: rejects mismatched confirmation before any request.
    pub fn passwords_match(&self) -> Option<String> {
        if self.new_password == self.confirm_password {
            None
        } else {
            Some("Passwords do not match".to_string())
        }
    }
}

/// Profile details; the email defaults to the signed-in identity.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 1, message = "Name is required"))]
    pub full_name: String,
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl ProfileForm {
    pub fn with_defaults(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into().trim().to_lowercase(),
            phone: String::new(),
        }
    }
}
