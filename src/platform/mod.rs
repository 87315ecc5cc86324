//! Platform bindings
//!
//! The simulation itself is platform-free. Browser hosts drive it through
//! [`web::WebGame`], which speaks JSON across the JS boundary.

#[cfg(target_arch = "wasm32")]
pub mod web;
