use anyhow::{Context, Result};
use kiosk::Kiosk;
use kiosk::domain::RawData;
use kiosk::vault::Certificate;
use std::path::Path;

use super::{read_input, write_output};

/// Loads a certificate file: PKCS#12 when a passphrase is given, DER or PEM otherwise.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_certificate(path: &Path, passphrase: Option<&str>) -> Result<Certificate> {
    let data = read_input(path)?;
    let certificate = match passphrase {
        Some(passphrase) => Certificate::from_pkcs12(&data, passphrase),
        None => Certificate::from_der(&data),
    };
    certificate.with_context(|| format!("Failed to load certificate {}", path.display()))
}

/// Imports the identity certificates embedded in the JSON settings at `input`.
///
/// The file is rewritten without the imported entries.
///
/// # Errors
/// Returns an error if the file is not a JSON object or cannot be rewritten.
pub fn import(kiosk: &Kiosk, input: &Path) -> Result<()> {
    let mut raw_data: RawData =
        serde_json::from_slice(&read_input(input)?).context("Settings file is not a JSON object")?;

    let imported = kiosk.certificates.import_identities(&mut raw_data);
    write_output(input, &serde_json::to_vec_pretty(&raw_data)?)?;

    println!("Imported {imported} identity certificate(s)");
    Ok(())
}
