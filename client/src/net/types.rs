//! Wire DTOs for the REST API boundary.
//!
//! DESIGN
//! ======
//! Field names mirror the backend JSON exactly. Optional profile fields use
//! `#[serde(default)]` so older or trimmed payloads still decode.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Authenticated user identity as returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Numeric user identifier.
    pub id: u64,
    /// Public handle, unique per account.
    pub username: String,
    /// Account email address.
    #[serde(default)]
    pub email: String,
    /// Avatar URL, if the user uploaded one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Whether the account email has been confirmed.
    #[serde(default)]
    pub is_verified: bool,
    /// RFC 3339 creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, rename = "is_admin")]
    admin: bool,
}

impl User {
    /// Build a minimal identity. Profile fields start empty.
    #[must_use]
    pub fn new(id: u64, username: impl Into<String>, admin: bool) -> Self {
        Self {
            id,
            username: username.into(),
            email: String::new(),
            profile_picture_url: None,
            bio: None,
            given_name: None,
            family_name: None,
            location: None,
            website: None,
            is_verified: false,
            created_at: None,
            admin,
        }
    }

    /// Whether this user may open admin-only screens.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Name to show in headers: given + family name when known, else username.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.given_name.as_deref(), self.family_name.as_deref()) {
            (Some(given), Some(family)) => format!("{given} {family}"),
            (Some(given), None) => given.to_owned(),
            _ => self.username.clone(),
        }
    }
}

/// `GET /users/me` response. `user` is absent when the token no longer maps
/// to an account.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MeResponse {
    #[serde(default)]
    pub user: Option<User>,
}

/// `POST /auth/login` request body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    /// Email address or username.
    #[serde(rename = "login")]
    pub identifier: String,
    pub password: String,
}

/// `POST /auth/login` success body.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// `POST /auth/register` request body.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// `POST /auth/register` success body.
///
/// Accounts that need email confirmation only get `message`; the backend may
/// also hand back `token` + `user` for immediate sign-in.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// `GET /auth/verify-email` success body. Some backend builds reply with the
/// bare message string instead of the full object.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VerifyEmailResponse {
    Full {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        token: Option<String>,
        #[serde(default)]
        user: Option<User>,
    },
    Message(String),
}

/// Error body returned on non-2xx responses.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Per-field validation or conflict messages.
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}
