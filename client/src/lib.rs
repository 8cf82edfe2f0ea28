//! FrameRate web client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Leptos app compiled twice: natively with `ssr` for the Axum host and to
//! WASM with `hydrate` for the browser. Session logic lives in `state` and
//! `net` and is plain Rust so it can be tested without a browser.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install console logging and hydrate the SSR markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
