//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration and delegates session work to
//! `state`. `home`, `profile` and `admin` are thin screens that exist so the
//! route guard has real targets.

pub mod admin;
pub mod auth;
pub mod home;
pub mod profile;
pub mod verify_email;
