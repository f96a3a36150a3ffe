//! Raw configuration keys the security core reads or rewrites.

/// List of certificates embedded in a configuration.
pub const EMBEDDED_CERTIFICATES: &str = "embeddedCertificates";
/// Base64 certificate payload inside an embedded certificate entry.
pub const CERTIFICATE_DATA: &str = "certificateData";
/// Numeric [`crate::certificates::CertificateType`] of an embedded certificate entry.
pub const CERTIFICATE_TYPE: &str = "type";
/// Keep the encryption of a client configuration instead of resetting it.
pub const KEEP_CLIENT_CONFIG_ENCRYPTION: &str = "clientConfigKeepEncryption";
/// Administrator supplied browser exam key overriding the derived one.
pub const CUSTOM_BROWSER_EXAM_KEY: &str = "browserExamKey";
