pub mod auth;
pub mod config;
pub mod exam;
pub mod history;
pub mod program;
pub mod set;
pub mod stats;

use std::sync::Arc;

use kensui_core::session::credentials;
use kensui_core::{
    AccountId, Config, LocalStore, Program, ProgressStore, ProgressTracker, RemoteStore,
};

/// The engine as one command sees it: a tracker wired to both store
/// backends, and the account the invocation is attributed to
/// (`None` = guest).
pub(crate) struct Context {
    pub tracker: ProgressTracker,
    pub account: Option<AccountId>,
}

impl Context {
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let account = config.account();

        let mut remote = config.remote.clone();
        // The keyring is only consulted for signed-in sessions; guest
        // commands must keep working on hosts without a secret service.
        if account.is_some() && remote.auth_token.is_none() {
            match credentials::get_token() {
                Ok(token) => remote.auth_token = token,
                Err(e) => eprintln!("warning: keyring unavailable ({e}), trying without a token"),
            }
        }

        let store = Arc::new(ProgressStore::new(
            RemoteStore::new(remote),
            LocalStore::open()?,
        ));
        let tracker = ProgressTracker::new(
            store,
            Program::default_progression(),
            config.clock(),
            config.daily_target,
        );
        Ok(Self { tracker, account })
    }

    pub fn account(&self) -> Option<&AccountId> {
        self.account.as_ref()
    }
}

/// Store calls are async; each command drives them on its own runtime.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn std::error::Error>> {
    Ok(tokio::runtime::Runtime::new()?)
}
