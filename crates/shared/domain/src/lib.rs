//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `serde_json`).
//! Keep it lean: no I/O, cryptography, or heavy logic, just data and simple helpers.

pub mod certificates;
pub mod config;
pub mod data;
pub mod encryption;
pub mod keys;
pub mod status;

pub use data::{Format, ParseResult, RawData, SerializeResult};
pub use encryption::{EncryptionParameters, PasswordParameters, PublicKeyParameters};
pub use status::{ConfigureStatus, LoadStatus, SaveStatus};
