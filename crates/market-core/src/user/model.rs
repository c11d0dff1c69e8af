//! User identity models.

use serde::{Deserialize, Serialize};

/// The client-trusted record of the currently authenticated user.
///
/// This is exactly what `/user/login` returns and what is persisted under the
/// session storage key. It carries no token and no expiry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub credit_score: i32,
}

/// Body of `/user/login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Body of `/user/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub phone: String,
    pub student_id: String,
}
