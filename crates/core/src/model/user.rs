use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role, from the registration form's user-type step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Student => write!(f, "student"),
            UserRole::Admin => write!(f, "admin"),
        }
    }
}

/// The authenticated user's profile, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub role: UserRole,
}

/// A validated registration request body.
///
/// Field-level validation happens in the auth service before this is built;
/// this type only carries the accepted values to the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub role: UserRole,
}
