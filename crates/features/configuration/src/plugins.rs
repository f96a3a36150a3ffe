//! Capabilities the repository selects from, in registration order.

use kiosk_domain::{EncryptionParameters, Format, ParseResult, PasswordParameters, RawData, SerializeResult};
use std::fmt::Debug;

use crate::error::ConfigurationError;

/// Reads configuration bytes from a URI.
pub trait ResourceLoader: Send + Sync + Debug {
    fn can_load(&self, uri: &str) -> bool;

    /// # Errors
    /// Whatever prevents reading the resource.
    fn load(&self, uri: &str) -> Result<Vec<u8>, ConfigurationError>;
}

/// Writes configuration bytes to a URI.
pub trait ResourceSaver: Send + Sync + Debug {
    fn can_save(&self, uri: &str) -> bool;

    /// # Errors
    /// Whatever prevents writing the resource.
    fn save(&self, uri: &str, data: &[u8]) -> Result<(), ConfigurationError>;
}

/// Decodes (and decrypts) one configuration dialect.
pub trait DataParser: Send + Sync + Debug {
    /// Cheap probe, usually a look at the leading bytes.
    fn can_parse(&self, data: &[u8]) -> bool;

    /// # Errors
    /// * [`ConfigurationError::PasswordNeeded`] (or a crypto source with that status) when the
    ///   password is missing or wrong.
    /// * [`ConfigurationError::InvalidData`] for undecodable content.
    fn parse(&self, data: &[u8], password: Option<&PasswordParameters>) -> Result<ParseResult, ConfigurationError>;
}

/// Encodes (and encrypts) raw data in one configuration dialect.
pub trait DataSerializer: Send + Sync + Debug {
    fn can_serialize(&self, format: Format) -> bool;

    /// `encryption == None` writes an unencrypted container.
    ///
    /// # Errors
    /// Encoding or encryption failures.
    fn serialize(
        &self,
        raw_data: &RawData,
        encryption: Option<&EncryptionParameters>,
    ) -> Result<SerializeResult, ConfigurationError>;
}
