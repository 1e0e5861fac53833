use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::submitted;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub admin: bool,
    pub owner: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterForm {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Raw form submission for a profile update. Both fields optional. The
/// address is submitted as `new_email` because the current address is
/// already spoken for: it is the key the update is applied under.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserForm {
    pub new_email: Option<String>,
    pub name: Option<String>,
}

/// Validated registration, email already lowercased.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Validated per-field changes for a profile update. `None` leaves the
/// stored value and the matching token claim alone.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none()
    }

    /// Email addresses are stored lowercase, so submissions fold before
    /// anything else sees them.
    pub fn from_form(form: &UserForm) -> UserChanges {
        UserChanges {
            email: submitted(&form.new_email).map(str::to_lowercase),
            name: submitted(&form.name).map(str::to_owned),
        }
    }
}

impl NewUser {
    pub fn from_form(form: &RegisterForm) -> Result<NewUser, AppError> {
        let (Some(email), Some(name), Some(password)) = (
            submitted(&form.email),
            submitted(&form.name),
            submitted(&form.password),
        ) else {
            return Err(AppError::MissingFields);
        };
        Ok(NewUser {
            email: email.to_lowercase(),
            name: name.to_owned(),
            password: password.to_owned(),
        })
    }
}
