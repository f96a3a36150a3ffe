#![allow(dead_code, unreachable_pub)]

use kiosk_configuration::{
    ConfigurationError, ConfigurationRepository, DataParser, DataSerializer, FileResourceLoader, FileResourceSaver,
    ResourceLoader,
};
use kiosk_domain::{
    EncryptionParameters, Format, ParseResult, PasswordParameters, PublicKeyParameters, RawData, SerializeResult,
};
use kiosk_vault::{Certificate, CertificateResolver, PasswordCipher, certificate_cipher};
use std::path::Path;
use std::sync::Arc;

pub const PLAIN: &[u8; 4] = b"plnd";
pub const PASSWORD: &[u8; 4] = b"pswd";
pub const PUBLIC_KEY: &[u8; 4] = b"pkhs";
pub const PUBLIC_KEY_SYMMETRIC: &[u8; 4] = b"phsk";

const HASH_LEN: usize = 20;

/// Minimal prefixed JSON dialect over the real ciphers.
#[derive(Debug)]
pub struct EnvelopeParser {
    pub resolver: Arc<dyn CertificateResolver>,
}

impl DataParser for EnvelopeParser {
    fn can_parse(&self, data: &[u8]) -> bool {
        [PLAIN, PASSWORD, PUBLIC_KEY, PUBLIC_KEY_SYMMETRIC].iter().any(|prefix| data.starts_with(*prefix))
    }

    fn parse(&self, data: &[u8], password: Option<&PasswordParameters>) -> Result<ParseResult, ConfigurationError> {
        let (prefix, body) = data.split_at(4);
        match prefix {
            p if p == PLAIN => Ok(ParseResult::new(Format::Binary, decode_json(body)?)),
            p if p == PASSWORD => {
                let plain = PasswordCipher.decrypt(body, password.map(|p| p.password.as_str()))?;
                let parameters = password.cloned().unwrap_or_default();
                Ok(ParseResult::new(Format::Binary, decode_json(&plain)?)
                    .with_encryption(EncryptionParameters::Password(parameters)))
            },
            p => {
                let symmetric = p == PUBLIC_KEY_SYMMETRIC;
                let plain = certificate_cipher(symmetric).decrypt(body, self.resolver.as_ref())?;
                let hash: [u8; HASH_LEN] = body[..HASH_LEN].try_into().map_err(|_| "short hash")?;
                let certificate = self.resolver.lookup_by_hash(&hash)?.ok_or("certificate vanished")?;

                Ok(ParseResult::new(Format::Binary, decode_json(&plain)?).with_encryption(
                    EncryptionParameters::PublicKey(PublicKeyParameters {
                        certificate: certificate.to_der()?,
                        inner_encryption: None,
                        symmetric_encryption: symmetric,
                    }),
                ))
            },
        }
    }
}

#[derive(Debug)]
pub struct EnvelopeSerializer;

impl DataSerializer for EnvelopeSerializer {
    fn can_serialize(&self, format: Format) -> bool {
        format == Format::Binary
    }

    fn serialize(
        &self,
        raw_data: &RawData,
        encryption: Option<&EncryptionParameters>,
    ) -> Result<SerializeResult, ConfigurationError> {
        let json = serde_json::to_vec(raw_data)?;
        let data = match encryption {
            None => [PLAIN.as_slice(), json.as_slice()].concat(),
            Some(EncryptionParameters::Password(parameters)) => {
                [PASSWORD.as_slice(), PasswordCipher.encrypt(&json, &parameters.password)?.as_slice()].concat()
            },
            Some(EncryptionParameters::PublicKey(parameters)) => {
                let certificate = Certificate::from_der(&parameters.certificate)?;
                let prefix = if parameters.symmetric_encryption { PUBLIC_KEY_SYMMETRIC } else { PUBLIC_KEY };
                let body = certificate_cipher(parameters.symmetric_encryption).encrypt(&json, &certificate)?;
                [prefix.as_slice(), body.as_slice()].concat()
            },
        };
        Ok(SerializeResult::from(data))
    }
}

/// Claims every URI and fails to read it.
#[derive(Debug)]
pub struct BrokenLoader;

impl ResourceLoader for BrokenLoader {
    fn can_load(&self, _uri: &str) -> bool {
        true
    }

    fn load(&self, uri: &str) -> Result<Vec<u8>, ConfigurationError> {
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, format!("connection to {uri} reset")).into())
    }
}

fn decode_json(data: &[u8]) -> Result<RawData, ConfigurationError> {
    serde_json::from_slice(data).map_err(|e| ConfigurationError::InvalidData {
        message: e.to_string().into(),
        context: Some("Decoding envelope".into()),
    })
}

/// Repository with file plugins and the envelope dialect, writing the client file to `client_path`.
pub fn repository(resolver: Arc<dyn CertificateResolver>, client_path: &Path) -> ConfigurationRepository {
    let mut repository = ConfigurationRepository::builder()
        .certificate_resolver(resolver.clone())
        .client_configuration_path(client_path)
        .build()
        .expect("repository");

    repository.register_loader(Arc::new(FileResourceLoader));
    repository.register_parser(Arc::new(EnvelopeParser { resolver }));
    repository.register_serializer(Arc::new(EnvelopeSerializer));
    repository.register_saver(Arc::new(FileResourceSaver));
    repository
}

pub fn write_envelope(
    dir: &Path,
    name: &str,
    raw_data: &RawData,
    encryption: Option<&EncryptionParameters>,
) -> String {
    let data = EnvelopeSerializer.serialize(raw_data, encryption).expect("serialize").data;
    let path = dir.join(name);
    std::fs::write(&path, data).expect("write envelope");
    path.to_string_lossy().into_owned()
}
