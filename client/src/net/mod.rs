//! Networking modules for the REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` is the single request gateway, `signal` carries the 401 broadcast
//! from that gateway to the session store, and `types` defines the wire schema.

pub mod api;
pub mod signal;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;
