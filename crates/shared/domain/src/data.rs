use crate::encryption::EncryptionParameters;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Untyped configuration values keyed by setting name.
///
/// Binary values (certificates, salts) travel as base64 strings.
pub type RawData = BTreeMap<String, Value>;

/// Declared format of a configuration resource, used to pick a serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Binary,
    Xml,
}

/// Output of a successful parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    pub format: Format,
    pub raw_data: RawData,
    /// Encryption detected on the parsed container; `None` for plain data.
    pub encryption: Option<EncryptionParameters>,
}

/// Output of a successful serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeResult {
    pub data: Vec<u8>,
}

impl ParseResult {
    #[must_use]
    pub const fn new(format: Format, raw_data: RawData) -> Self {
        Self { format, raw_data, encryption: None }
    }

    #[must_use]
    pub fn with_encryption(mut self, encryption: EncryptionParameters) -> Self {
        self.encryption = Some(encryption);
        self
    }
}

impl From<Vec<u8>> for SerializeResult {
    fn from(data: Vec<u8>) -> Self {
        Self { data }
    }
}
