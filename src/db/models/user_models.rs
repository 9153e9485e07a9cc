use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub user_id: String,
    pub mobile: String,
    pub password: String,
    pub role: UserRole,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// User role enum, ordered by capability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UserRole {
    #[serde(rename = "operator")]
    Operator,
    #[serde(rename = "supervisor")]
    Supervisor,
    #[serde(rename = "manager")]
    Manager,
}

impl UserRole {
    /// Fixed capability ranking used for gating review/approval actions
    pub fn rank(&self) -> u8 {
        match self {
            UserRole::Operator => 1,
            UserRole::Supervisor => 2,
            UserRole::Manager => 3,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Operator => "operator",
            UserRole::Supervisor => "supervisor",
            UserRole::Manager => "manager",
        };
        f.write_str(s)
    }
}

/// Fields for creating a user; the store assigns id and created_at
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub user_id: String,
    pub mobile: String,
    pub password: String,
    pub role: UserRole,
    pub name: String,
}

/// Sanitized user identity returned by the auth endpoints.
/// The password never leaves the credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i64,
    pub user_id: String,
    pub mobile: String,
    pub name: String,
    pub role: UserRole,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            user_id: user.user_id.clone(),
            mobile: user.mobile.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Login credentials for the password flow
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCredentials {
    pub user_id: String,
    pub password: String,
    pub role: UserRole,
}

/// Request for issuing an OTP
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpLoginRequest {
    pub user_id: String,
    pub role: UserRole,
}

/// Request for verifying an issued OTP
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerifyRequest {
    pub user_id: String,
    pub code: String,
    pub role: UserRole,
}
