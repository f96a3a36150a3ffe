//! # Integrity Keys
//!
//! Hashes a kiosk client attaches to server requests so the server can verify which configuration
//! and which client build it talks to.
//!
//! * **Configuration key hash**: `SHA-256(url + configuration_key)`.
//! * **Browser exam key hash**: `SHA-256(url + browser_exam_key)`, where the browser exam key is
//!   derived once per process, by an [`IntegrityModule`] when one is available, otherwise as
//!   `HMAC-SHA256(salt, code_signature_hash + build_version + configuration_key)`.
//!
//! URLs are hashed without their fragment, so every anchor of a page yields the same token.
//! All hashes are lowercase hex.

mod error;
mod generator;
mod module;

pub use crate::error::{IntegrityError, IntegrityErrorExt};
pub use crate::generator::{KeyGenerator, strip_fragment};
pub use crate::module::IntegrityModule;
