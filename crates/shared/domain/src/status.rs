use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of loading, parsing or decrypting configuration data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadStatus {
    Success,
    /// A password is missing, wrong, or the data failed authentication.
    ///
    /// These causes are deliberately indistinguishable.
    PasswordNeeded,
    /// The data references a certificate that cannot be resolved.
    InvalidData,
    /// No registered plugin can handle the input.
    NotSupported,
    UnexpectedError,
}

/// Outcome of serializing and persisting configuration data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaveStatus {
    Success,
    NotSupported,
    UnexpectedError,
}

/// Outcome of configuring the local client, which runs a load stage followed by a save stage.
///
/// A failing load stage is reported as-is rather than folded into [`SaveStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigureStatus {
    Load(LoadStatus),
    Save(SaveStatus),
}

impl LoadStatus {
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl SaveStatus {
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl ConfigureStatus {
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Save(SaveStatus::Success))
    }
}

impl From<LoadStatus> for SaveStatus {
    /// Folds a load-side status into the narrower save taxonomy.
    fn from(status: LoadStatus) -> Self {
        match status {
            LoadStatus::Success => Self::Success,
            LoadStatus::NotSupported => Self::NotSupported,
            _ => Self::UnexpectedError,
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for ConfigureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(status) => write!(f, "load:{status}"),
            Self::Save(status) => write!(f, "save:{status}"),
        }
    }
}
