use serde::{Deserialize, Serialize};

/// Kind of an embedded certificate entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CertificateType {
    SslClient = 0,
    /// Certificate bundled with its private key (PKCS#12).
    Identity = 1,
    Ca = 2,
    Ssl = 3,
}

impl TryFrom<u64> for CertificateType {
    type Error = u64;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::SslClient),
            1 => Ok(Self::Identity),
            2 => Ok(Self::Ca),
            3 => Ok(Self::Ssl),
            other => Err(other),
        }
    }
}
