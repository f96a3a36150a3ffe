use kiosk_vault::Certificate;
use std::fmt::{self, Debug, Display};

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreLocation {
    CurrentUser,
    LocalMachine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreName {
    /// Personal certificates (`My`).
    Personal,
    TrustedPeople,
}

/// One trust store, addressed by location and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StoreId {
    pub location: StoreLocation,
    pub name: StoreName,
}

impl StoreId {
    pub const CURRENT_USER_PERSONAL: Self =
        Self { location: StoreLocation::CurrentUser, name: StoreName::Personal };
    pub const LOCAL_MACHINE_PERSONAL: Self =
        Self { location: StoreLocation::LocalMachine, name: StoreName::Personal };
    pub const LOCAL_MACHINE_TRUSTED_PEOPLE: Self =
        Self { location: StoreLocation::LocalMachine, name: StoreName::TrustedPeople };

    /// Stable path-friendly form, e.g. `current-user/personal`.
    #[must_use]
    pub const fn as_path(&self) -> &'static str {
        match (self.location, self.name) {
            (StoreLocation::CurrentUser, StoreName::Personal) => "current-user/personal",
            (StoreLocation::CurrentUser, StoreName::TrustedPeople) => "current-user/trusted-people",
            (StoreLocation::LocalMachine, StoreName::Personal) => "local-machine/personal",
            (StoreLocation::LocalMachine, StoreName::TrustedPeople) => "local-machine/trusted-people",
        }
    }
}

impl Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    ReadWrite,
}

/// Storage behind the trust stores.
///
/// Handles are scoped: a store is open exactly as long as its handle lives.
pub trait StoreBackend: Send + Sync + Debug {
    type Handle: StoreHandle;

    /// # Errors
    /// Backend-specific failures while opening the store.
    fn open(&self, store: StoreId, mode: OpenMode) -> Result<Self::Handle, StoreError>;
}

/// An open trust store.
pub trait StoreHandle {
    /// Certificates in a stable order.
    ///
    /// # Errors
    /// Backend-specific failures while enumerating the store.
    fn certificates(&self) -> Result<Vec<Certificate>, StoreError>;

    /// # Errors
    /// [`StoreError::ReadOnly`] for handles opened with [`OpenMode::ReadOnly`], or backend failures.
    fn add(&mut self, certificate: &Certificate) -> Result<(), StoreError>;
}
