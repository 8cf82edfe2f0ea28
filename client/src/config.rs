//! Build-time client configuration.
//!
//! The REST base URL is baked in at compile time from `FRAMERATE_API_URL` so
//! the same WASM bundle can target a local or deployed backend.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Backend used when `FRAMERATE_API_URL` is unset at build time.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// REST base URL for this build.
#[must_use]
pub fn api_base_url() -> &'static str {
    resolve_api_url(option_env!("FRAMERATE_API_URL"))
}

fn resolve_api_url(configured: Option<&'static str>) -> &'static str {
    match configured.map(str::trim) {
        Some(url) if !url.is_empty() => url,
        _ => DEFAULT_API_URL,
    }
}
