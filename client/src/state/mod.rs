//! Client-side session and form state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` owns the signed-in identity and persisted token, `auth` is the
//! snapshot it publishes, and `auth_form` drives the sign-in/sign-up screens.

pub mod auth;
pub mod auth_form;
pub mod session;
