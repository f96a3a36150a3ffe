use hmac::{Hmac, Mac};
use kiosk_domain::config::AppConfig;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::IntegrityError;
use crate::module::IntegrityModule;

type HmacSha256 = Hmac<Sha256>;

/// Derives the per-URL integrity hashes sent with every server request.
///
/// The browser exam key behind [`KeyGenerator::browser_exam_key_hash`] is computed at most once per
/// generator; concurrent callers wait for the first computation and reuse its result.
#[derive(Debug)]
pub struct KeyGenerator {
    code_signature_hash: String,
    program_build_version: String,
    module: Option<Arc<dyn IntegrityModule>>,
    browser_exam_key: Mutex<Option<String>>,
}

impl KeyGenerator {
    pub fn new(code_signature_hash: impl Into<String>, program_build_version: impl Into<String>) -> Self {
        Self {
            code_signature_hash: code_signature_hash.into(),
            program_build_version: program_build_version.into(),
            module: None,
            browser_exam_key: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.code_signature_hash.clone(), config.program_build_version.clone())
    }

    /// Consults `module` first when deriving the browser exam key.
    #[must_use]
    pub fn with_integrity_module(mut self, module: Arc<dyn IntegrityModule>) -> Self {
        self.module = Some(module);
        self
    }

    /// `hex(SHA-256(url_without_fragment + configuration_key))`.
    #[must_use]
    pub fn configuration_key_hash(&self, configuration_key: &str, url: &str) -> String {
        hash_for_url(url, configuration_key)
    }

    /// `hex(SHA-256(url_without_fragment + browser_exam_key))`.
    ///
    /// # Errors
    /// [`IntegrityError::Internal`] if the fallback derivation cannot be keyed.
    pub fn browser_exam_key_hash(
        &self,
        configuration_key: &str,
        salt: &[u8],
        url: &str,
    ) -> Result<String, IntegrityError> {
        let browser_exam_key = self.browser_exam_key(configuration_key, salt)?;
        Ok(hash_for_url(url, &browser_exam_key))
    }

    /// Replaces the derived browser exam key for the rest of the generator's life.
    ///
    /// Empty keys are ignored.
    pub fn use_custom_browser_exam_key(&self, browser_exam_key: &str) {
        if browser_exam_key.is_empty() {
            return;
        }

        *self.browser_exam_key.lock() = Some(browser_exam_key.to_owned());
        info!("Using custom browser exam key");
    }

    fn browser_exam_key(&self, configuration_key: &str, salt: &[u8]) -> Result<String, IntegrityError> {
        let mut cell = self.browser_exam_key.lock();
        if let Some(key) = cell.as_ref() {
            return Ok(key.clone());
        }

        let key = self.derive_browser_exam_key(configuration_key, salt)?;
        *cell = Some(key.clone());
        Ok(key)
    }

    fn derive_browser_exam_key(&self, configuration_key: &str, salt: &[u8]) -> Result<String, IntegrityError> {
        if let Some(module) = &self.module {
            match module.try_calculate_browser_exam_key(configuration_key, salt) {
                Ok(key) => {
                    debug!("Browser exam key calculated by integrity module");
                    return Ok(key);
                },
                Err(e) => warn!(error = %e, "Integrity module failed, falling back to HMAC derivation"),
            }
        }

        let mut mac = HmacSha256::new_from_slice(salt).map_err(|e| IntegrityError::Internal {
            message: e.to_string().into(),
            context: Some("Keying browser exam key HMAC".into()),
        })?;
        mac.update(self.code_signature_hash.as_bytes());
        mac.update(self.program_build_version.as_bytes());
        mac.update(configuration_key.as_bytes());

        debug!("Browser exam key derived from HMAC");
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

/// The part of `url` before the first `#`.
#[must_use]
pub fn strip_fragment(url: &str) -> &str {
    url.split_once('#').map_or(url, |(base, _)| base)
}

fn hash_for_url(url: &str, key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(strip_fragment(url).as_bytes());
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_is_stripped() {
        assert_eq!(strip_fragment("https://x/y#a"), "https://x/y");
        assert_eq!(strip_fragment("https://x/y"), "https://x/y");
        assert_eq!(strip_fragment("https://x/y?q=1#a#b"), "https://x/y?q=1");
    }

    #[test]
    fn configuration_key_hash_matches_plain_sha256() {
        let generator = KeyGenerator::new("signature", "1.0.0");
        let expected = hex::encode(Sha256::digest(b"https://exam.example.org/startkey"));

        assert_eq!(generator.configuration_key_hash("key", "https://exam.example.org/start#top"), expected);
    }

    #[test]
    fn fallback_hmac_covers_signature_version_and_key() {
        let generator = KeyGenerator::new("sig", "3.8");

        let mut mac = HmacSha256::new_from_slice(b"salt").unwrap();
        mac.update(b"sig3.8config");
        let expected = hex::encode(mac.finalize().into_bytes());

        assert_eq!(generator.browser_exam_key("config", b"salt").unwrap(), expected);
    }

    #[test]
    fn empty_custom_key_is_ignored() {
        let generator = KeyGenerator::new("sig", "3.8");
        let derived = generator.browser_exam_key("config", b"salt").unwrap();

        generator.use_custom_browser_exam_key("");
        assert_eq!(generator.browser_exam_key("config", b"salt").unwrap(), derived);
    }
}
