//! Account identity.
//!
//! The engine never keeps a global "current user". Every store call
//! takes the account explicitly, so attribution is decided by whoever
//! makes the call. [`Session`] is the injectable identity source for
//! long-running front-ends: a watch channel whose value is the current
//! account id, `None` meaning guest. A switch is complete the moment
//! the new value is published; any `current()` snapshot taken after
//! that belongs to the new namespace.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Opaque account identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Identity state shared between a front-end and the engine.
pub struct Session {
    tx: watch::Sender<Option<AccountId>>,
}

impl Session {
    /// Start as guest.
    pub fn new() -> Self {
        Self::with_account(None)
    }

    /// Start with a known identity, e.g. restored from configuration.
    pub fn with_account(account: Option<AccountId>) -> Self {
        let (tx, _rx) = watch::channel(account);
        Self { tx }
    }

    /// Snapshot of the current identity; `None` means guest.
    pub fn current(&self) -> Option<AccountId> {
        self.tx.borrow().clone()
    }

    /// Subscribe to identity changes. `changed().await` on the
    /// receiver wakes on every sign-in and sign-out.
    pub fn subscribe(&self) -> watch::Receiver<Option<AccountId>> {
        self.tx.subscribe()
    }

    /// Publish a signed-in identity.
    pub fn sign_in(&self, account: AccountId) {
        self.tx.send_replace(Some(account));
    }

    /// Drop back to guest.
    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Thin wrapper around the OS keyring for the remote-store token.
///
/// The token never goes into the config file; only the account id
/// does.
pub mod credentials {
    const SERVICE: &str = "kensui";
    const TOKEN_KEY: &str = "id_token";

    /// Load the stored id token, `None` when nothing was saved.
    pub fn get_token() -> Result<Option<String>, Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, TOKEN_KEY)?;
        match entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Store the id token.
    pub fn set_token(value: &str) -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, TOKEN_KEY)?;
        entry.set_password(value)?;
        Ok(())
    }

    /// Forget the id token; absent tokens are not an error.
    pub fn clear_token() -> Result<(), Box<dyn std::error::Error>> {
        let entry = keyring::Entry::new(SERVICE, TOKEN_KEY)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
