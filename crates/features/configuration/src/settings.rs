use kiosk_domain::keys::CUSTOM_BROWSER_EXAM_KEY;
use kiosk_domain::{EncryptionParameters, Format, RawData};
use serde_json::Value;

/// Settings produced by a successful load.
///
/// The value schema belongs to the dialect parsers; this type only exposes the keys the security
/// core itself acts on and keeps everything else as raw values.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    format: Format,
    encryption: Option<EncryptionParameters>,
    raw_data: RawData,
}

impl Settings {
    #[must_use]
    pub const fn new(format: Format, encryption: Option<EncryptionParameters>, raw_data: RawData) -> Self {
        Self { format, encryption, raw_data }
    }

    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Encryption the settings were stored with.
    #[must_use]
    pub const fn encryption(&self) -> Option<&EncryptionParameters> {
        self.encryption.as_ref()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw_data.get(key)
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Administrator supplied browser exam key, if set and non-empty.
    #[must_use]
    pub fn custom_browser_exam_key(&self) -> Option<&str> {
        self.get_str(CUSTOM_BROWSER_EXAM_KEY).filter(|key| !key.is_empty())
    }

    #[must_use]
    pub const fn raw_data(&self) -> &RawData {
        &self.raw_data
    }
}
