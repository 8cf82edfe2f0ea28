//! Host configuration from the environment and `Cargo.toml`.
//!
//! Leptos options come from `[package.metadata.leptos]` (or the `LEPTOS_*`
//! variables `cargo leptos` exports); `PORT` then overrides the listen port so
//! the same binary runs behind platforms that assign one.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use leptos::prelude::{LeptosOptions, get_configuration};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("leptos configuration: {0}")]
    Leptos(String),
    #[error("invalid PORT {value:?}")]
    InvalidPort { value: String },
}

#[derive(Debug, Clone)]
pub struct HostConfig {
    pub leptos: LeptosOptions,
    pub addr: SocketAddr,
}

impl HostConfig {
    /// Load Leptos options and apply `PORT`.
    ///
    /// Optional:
    /// - `PORT`: listen port, default 3000
    /// - `LEPTOS_OUTPUT_NAME`: when set, all Leptos options are read from the
    ///   environment instead of `Cargo.toml`
    pub fn from_env() -> Result<Self, ConfigError> {
        let manifest = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
        let source = if std::env::var_os("LEPTOS_OUTPUT_NAME").is_some() { None } else { Some(manifest) };
        let conf = get_configuration(source).map_err(|e| ConfigError::Leptos(e.to_string()))?;

        let mut leptos = conf.leptos_options;
        let port = parse_port(std::env::var("PORT").ok().as_deref())?;
        let addr = bind_addr(port);
        leptos.site_addr = addr;
        Ok(Self { leptos, addr })
    }
}

/// Parse `PORT`; unset or blank means [`DEFAULT_PORT`].
pub fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidPort { value: value.to_owned() }),
    }
}

/// All interfaces on `port`.
#[must_use]
pub fn bind_addr(port: u16) -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)
}
