use anyhow::{Context, Result};
use kiosk::Kiosk;

/// Prints the configuration key hash for `url`.
pub fn config_key_hash(kiosk: &Kiosk, key: &str, url: &str) {
    println!("{}", kiosk.key_generator.configuration_key_hash(key, url));
}

/// Prints the browser exam key hash for `url`.
///
/// # Errors
/// Returns an error if `salt` is not hex or the key cannot be derived.
pub fn exam_key_hash(kiosk: &Kiosk, key: &str, salt: &str, url: &str, custom: Option<&str>) -> Result<()> {
    let salt = hex::decode(salt).context("Salt must be hex encoded")?;
    if let Some(custom) = custom {
        kiosk.key_generator.use_custom_browser_exam_key(custom);
    }

    let hash = kiosk.key_generator.browser_exam_key_hash(key, &salt, url)?;
    println!("{hash}");
    Ok(())
}
