#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the kiosk infrastructure and feature crates.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! kiosk-derive.workspace = true
//! thiserror.workspace = true
//! ```

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants containing a `source` field
///   (or a field marked `#[source]`/`#[from]`), enabling the `?` operator for upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * **Status Mapping**: Variants annotated with `#[status(Kind)]` map onto
///   `kiosk_domain::LoadStatus::Kind`; `#[status(from_source)]` delegates to the source error's
///   own `status()`. When at least one variant is annotated, an inherent
///   `fn status(&self) -> LoadStatus` is generated and every unannotated variant maps to
///   `LoadStatus::UnexpectedError`.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum** with named-field variants only.
/// 2. Variants that carry a source must also carry `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use kiosk_derive::kiosk_error;
/// use std::borrow::Cow;
///
/// #[kiosk_error]
/// pub enum StoreError {
///     #[status(InvalidData)]
///     #[error("Certificate not found{}: {message}", format_context(.context))]
///     NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &std::path::Path) -> Result<Vec<u8>, StoreError> {
///     std::fs::read(path).context("Reading certificate file")
/// }
/// ```
#[proc_macro_attribute]
pub fn kiosk_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
