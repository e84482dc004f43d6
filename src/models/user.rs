use serde::{Deserialize, Serialize};
use crate::models::deserialize_optional_id;

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct User {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Deserialize, Debug)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Deserialize, Debug)]
pub struct CurrentUserResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<User>,
}

/// A verified administrator session, as issued by the backend on login.
#[derive(Clone, Debug)]
pub struct IssuedSession {
    pub token: String,
    pub user: User,
}
