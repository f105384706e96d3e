//! Request and response types for the authentication endpoints.

use serde::{Deserialize, Serialize};

/// Signup request body
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    /// Company-scoping phone number; optional at signup, required before any
    /// company-scoped route can be used
    #[serde(default)]
    pub company_number: Option<String>,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token plus user info, returned by signup and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// User info without credentials
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_number: Option<String>,
}
