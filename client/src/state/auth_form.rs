//! Sign-in / sign-up form model and submission flow.
//!
//! SYSTEM CONTEXT
//! ==============
//! `pages::auth` binds these types to inputs. Validation runs first and a
//! failing form never reaches the network; successful submissions feed the
//! session store, failures leave it untouched.
//!
//! DESIGN
//! ======
//! Whether registration signs the user in right away is decided by the
//! server's response shape (`token` + `user` present), not by client policy.

#[cfg(test)]
#[path = "auth_form_test.rs"]
mod auth_form_test;

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::net::api::{ApiClient, ApiError, Transport};
use crate::net::types::{LoginRequest, RegisterRequest, RegisterResponse, User, VerifyEmailResponse};
use crate::state::session::SessionStore;
use crate::util::token_store::TokenStore;

const LOGIN_FAILED: &str = "Login failed";
const REGISTER_FAILED: &str = "Registration failed";
const NETWORK_FAILED: &str = "Unable to reach the server. Please try again.";
const REGISTER_PENDING: &str = "Registration successful! Please check your email to verify your account.";
const VERIFY_FAILED: &str = "Verification failed. The link may be expired or invalid.";
const VERIFY_MISSING_TOKEN: &str = "Missing verification token.";
const VERIFY_OK: &str = "Your email has been successfully verified!";

/// Which form is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    /// Flip between modes. Purely presentational.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Login => Self::Register,
            Self::Register => Self::Login,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Welcome Back",
            Self::Register => "Create Account",
        }
    }

    #[must_use]
    pub fn submit_label(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
        }
    }
}

/// Form inputs that can carry an inline error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Identifier,
    Email,
    Username,
    Password,
    ConfirmPassword,
}

impl Field {
    /// Map a server-side error key onto a form field.
    #[must_use]
    pub fn from_server_key(key: &str) -> Option<Self> {
        match key {
            "login" | "identifier" => Some(Self::Identifier),
            "email" => Some(Self::Email),
            "username" => Some(Self::Username),
            "password" => Some(Self::Password),
            "confirm_password" | "confirmPassword" => Some(Self::ConfirmPassword),
            _ => None,
        }
    }
}

/// Inline messages keyed by field; at most one per field.
pub type FieldErrors = BTreeMap<Field, String>;

fn field_errors_from_server(fields: &BTreeMap<String, String>) -> FieldErrors {
    fields
        .iter()
        .filter_map(|(key, msg)| Field::from_server_key(key).map(|field| (field, msg.clone())))
        .collect()
}

/// Sign-in inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    /// Email address or username.
    pub identifier: String,
    pub password: String,
}

impl LoginForm {
    /// Check inputs and build the request body.
    ///
    /// # Errors
    ///
    /// Every failing field with its message.
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let identifier = self.identifier.trim();
        // Either a valid email or any 3+ character string.
        if identifier.is_empty() {
            errors.insert(Field::Identifier, "Email or Username is required".to_owned());
        } else if !is_valid_email(identifier) && identifier.chars().count() < 3 {
            let msg = if identifier.contains('@') {
                "Invalid email format"
            } else {
                "Username must be at least 3 characters"
            };
            errors.insert(Field::Identifier, msg.to_owned());
        }
        if self.password.chars().count() < 6 {
            errors.insert(Field::Password, "Password must be at least 6 characters".to_owned());
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(LoginRequest { identifier: identifier.to_owned(), password: self.password.clone() })
    }
}

/// Sign-up inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    /// Check inputs and build the request body.
    ///
    /// # Errors
    ///
    /// Every failing field with its first message.
    pub fn validate(&self) -> Result<RegisterRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = self.email.trim();
        let username = self.username.trim();

        if email.is_empty() {
            errors.insert(Field::Email, "Email is required".to_owned());
        } else if !is_valid_email(email) {
            errors.insert(Field::Email, "Invalid email format".to_owned());
        }

        if let Some(msg) = username_problem(username) {
            errors.insert(Field::Username, msg.to_owned());
        }
        if let Some(msg) = password_problem(&self.password) {
            errors.insert(Field::Password, msg.to_owned());
        }

        if self.confirm_password.is_empty() {
            errors.insert(Field::ConfirmPassword, "Please confirm your password".to_owned());
        } else if self.confirm_password != self.password {
            errors.insert(Field::ConfirmPassword, "Passwords don't match".to_owned());
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(RegisterRequest {
            email: email.to_owned(),
            username: username.to_owned(),
            password: self.password.clone(),
        })
    }
}

fn username_problem(username: &str) -> Option<&'static str> {
    let len = username.chars().count();
    if len < 3 {
        Some("Username must be at least 3 characters")
    } else if len > 20 {
        Some("Username must be at most 20 characters")
    } else if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Some("Username can only contain letters, numbers and underscores")
    } else {
        None
    }
}

fn password_problem(password: &str) -> Option<&'static str> {
    if password.chars().count() < 8 {
        Some("Password must be at least 8 characters")
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some("Password must contain at least one uppercase letter")
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        Some("Password must contain at least one lowercase letter")
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("Password must contain at least one number")
    } else {
        None
    }
}

/// Email shape check: dot-atom local part, dotted hostname labels, and an
/// alphabetic TLD of at least two letters.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
            .expect("email pattern compiles")
    });
    !value.starts_with('.') && !value.contains("..") && EMAIL.is_match(value)
}

/// Terminal display state of a successful submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Session now holds this user.
    SignedIn(User),
    /// Account created; the user must confirm their email first.
    PendingVerification(String),
}

/// Why a submission did not sign anyone in.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// Client-side validation failed; nothing was sent.
    #[error("please fix the highlighted fields")]
    Invalid(FieldErrors),
    /// The server refused; `message` is its text verbatim when it sent one.
    #[error("{message}")]
    Rejected { message: String, fields: FieldErrors },
}

impl SubmitError {
    fn from_api(err: &ApiError, fallback: &str) -> Self {
        let fields = field_errors_from_server(&err.field_errors());
        let message = match err {
            ApiError::Network(_) => NETWORK_FAILED.to_owned(),
            _ => err
                .server_message()
                .map(str::to_owned)
                .or_else(|| fields.values().next().cloned())
                .unwrap_or_else(|| fallback.to_owned()),
        };
        Self::Rejected { message, fields }
    }

    /// Inline messages to show next to inputs.
    #[must_use]
    pub fn fields(&self) -> &FieldErrors {
        match self {
            Self::Invalid(fields) | Self::Rejected { fields, .. } => fields,
        }
    }

    /// Banner text, if any. Validation failures only show inline.
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        match self {
            Self::Invalid(_) => None,
            Self::Rejected { message, .. } => Some(message),
        }
    }
}

/// Validate, send `POST /auth/login`, and sign in on success.
///
/// # Errors
///
/// `Invalid` before any request, `Rejected` when the server refuses.
pub async fn submit_login<T: Transport, S: TokenStore>(
    form: &LoginForm,
    api: &ApiClient<T, S>,
    session: &SessionStore<S>,
) -> Result<SubmitOutcome, SubmitError> {
    let request = form.validate().map_err(SubmitError::Invalid)?;
    let resp = api
        .login(&request)
        .await
        .map_err(|e| SubmitError::from_api(&e, LOGIN_FAILED))?;
    session.login(resp.user.clone(), &resp.token);
    Ok(SubmitOutcome::SignedIn(resp.user))
}

/// Validate, send `POST /auth/register`, and sign in only when the server
/// returned a token for the new account.
///
/// # Errors
///
/// `Invalid` before any request, `Rejected` when the server refuses.
pub async fn submit_register<T: Transport, S: TokenStore>(
    form: &RegisterForm,
    api: &ApiClient<T, S>,
    session: &SessionStore<S>,
) -> Result<SubmitOutcome, SubmitError> {
    let request = form.validate().map_err(SubmitError::Invalid)?;
    let resp = api
        .register(&request)
        .await
        .map_err(|e| SubmitError::from_api(&e, REGISTER_FAILED))?;
    Ok(match resp {
        RegisterResponse { token: Some(token), user: Some(user), .. } => {
            session.login(user.clone(), &token);
            SubmitOutcome::SignedIn(user)
        }
        RegisterResponse { message, .. } => {
            SubmitOutcome::PendingVerification(message.unwrap_or_else(|| REGISTER_PENDING.to_owned()))
        }
    })
}

/// Result of following an email verification link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Verified and signed in with the returned credentials.
    SignedIn { user: User, message: String },
    /// Verified; the user still has to sign in.
    Verified { message: String },
}

impl VerifyOutcome {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::SignedIn { message, .. } | Self::Verified { message } => message,
        }
    }
}

/// Confirm an email address with the link token.
///
/// # Errors
///
/// Display text: missing token (no request sent), or the server's message.
pub async fn confirm_email<T: Transport, S: TokenStore>(
    token: Option<&str>,
    api: &ApiClient<T, S>,
    session: &SessionStore<S>,
) -> Result<VerifyOutcome, String> {
    let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        return Err(VERIFY_MISSING_TOKEN.to_owned());
    };
    let resp = api
        .verify_email(token)
        .await
        .map_err(|e| e.server_message().unwrap_or(VERIFY_FAILED).to_owned())?;
    Ok(match resp {
        VerifyEmailResponse::Full { message, token: Some(token), user: Some(user) } => {
            session.login(user.clone(), &token);
            VerifyOutcome::SignedIn { user, message: message.unwrap_or_else(|| VERIFY_OK.to_owned()) }
        }
        VerifyEmailResponse::Full { message, token, .. } => {
            if token.is_some() {
                leptos::logging::warn!("verify-email returned a token without a user; ignoring it");
            }
            VerifyOutcome::Verified { message: message.unwrap_or_else(|| VERIFY_OK.to_owned()) }
        }
        VerifyEmailResponse::Message(message) => VerifyOutcome::Verified { message },
    })
}
