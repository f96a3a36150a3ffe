//! # Configuration Repository
//!
//! Drives the two configuration pipelines of the kiosk client:
//!
//! * **Load settings**: loader → parser → [`Settings`] (+ custom browser exam key hand-off).
//! * **Configure client**: loader → parser → identity import → encryption decision → serializer →
//!   saver, writing the local client configuration.
//!
//! Loaders, parsers, serializers and savers are registered at startup and selected by a linear
//! first-match scan. Every stage failure is a [`ConfigurationError`]; the public operations turn it
//! into a [`kiosk_domain::LoadStatus`] (or [`kiosk_domain::ConfigureStatus`]) and never panic on
//! bad input.

mod error;
mod file;
mod plugins;
mod repository;
mod settings;

pub use crate::error::{ConfigurationError, ConfigurationErrorExt};
pub use crate::file::{FileResourceLoader, FileResourceSaver, local_path};
pub use crate::plugins::{DataParser, DataSerializer, ResourceLoader, ResourceSaver};
pub use crate::repository::{ConfigurationRepository, ConfigurationRepositoryBuilder, determine_encryption};
pub use crate::settings::Settings;
