//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it re-exports the domain model and the layered config loader.
//!
//! ## Config loading
//! ```rust,no_run
//! use kiosk_kernel::config::load_app_config;
//!
//! let cfg = load_app_config(Some("kiosk.toml")).unwrap_or_default();
//! assert!(!cfg.program_build_version.is_empty());
//! ```
pub mod config;

pub use kiosk_domain as domain;
