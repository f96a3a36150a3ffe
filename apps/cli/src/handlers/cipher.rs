use anyhow::{Context, Result};
use kiosk::Kiosk;
use kiosk::vault::{PasswordCipher, certificate_cipher};
use std::path::Path;
use tracing::info;

use super::certificates::load_certificate;
use super::{read_input, write_output};

/// Wraps `input` in a password container.
///
/// # Errors
/// Returns an error if a file cannot be read or written, or the cipher fails.
pub fn encrypt(input: &Path, output: &Path, password: &str) -> Result<()> {
    let data = read_input(input)?;
    let container = PasswordCipher.encrypt(&data, password).context("Failed to encrypt")?;
    write_output(output, &container)?;

    info!(input = %input.display(), bytes = data.len(), "Password container written");
    println!("Encrypted {} bytes into {}", data.len(), output.display());
    Ok(())
}

/// Opens a password container.
///
/// # Errors
/// Returns an error if the password is missing or wrong, the container was modified, or I/O fails.
pub fn decrypt(input: &Path, output: &Path, password: Option<&str>) -> Result<()> {
    let container = read_input(input)?;
    let data = PasswordCipher.decrypt(&container, password).context("Failed to decrypt password container")?;
    write_output(output, &data)?;

    println!("Decrypted {} bytes into {}", data.len(), output.display());
    Ok(())
}

/// Encrypts `input` for the certificate at `certificate`.
///
/// # Errors
/// Returns an error if the certificate cannot be loaded or encryption fails.
pub fn seal(
    input: &Path,
    output: &Path,
    certificate: &Path,
    passphrase: Option<&str>,
    symmetric: bool,
) -> Result<()> {
    let certificate = load_certificate(certificate, passphrase)?;
    let data = read_input(input)?;
    let container = certificate_cipher(symmetric).encrypt(&data, &certificate).context("Failed to seal")?;
    write_output(output, &container)?;

    let thumbprint = hex::encode(certificate.public_key_hash()?);
    info!(%thumbprint, symmetric, bytes = data.len(), "Certificate container written");
    println!("Sealed {} bytes for {thumbprint} into {}", data.len(), output.display());
    Ok(())
}

/// Decrypts a certificate container using the identities in the certificate stores.
///
/// # Errors
/// Returns an error if no store holds the identity or decryption fails.
pub fn unseal(kiosk: &Kiosk, input: &Path, output: &Path, symmetric: bool) -> Result<()> {
    let container = read_input(input)?;
    let data = certificate_cipher(symmetric)
        .decrypt(&container, kiosk.certificates.as_ref())
        .context("Failed to unseal certificate container")?;
    write_output(output, &data)?;

    println!("Unsealed {} bytes into {}", data.len(), output.display());
    Ok(())
}
