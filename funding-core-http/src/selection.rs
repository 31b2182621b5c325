use std::path::PathBuf;
use std::str::FromStr;

use funding_core_api::domain::account::AccountType;
use funding_core_client::gateway::SelectionStorage;

/// Durable account-type selection, one word in a file. Storage failures
/// are logged and swallowed; the selection falls back to the server's
/// answer or the default on the next load.
#[derive(Debug)]
pub struct FileSelectionStorage {
    path: PathBuf,
}

impl FileSelectionStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SelectionStorage for FileSelectionStorage {
    fn load(&self) -> Option<AccountType> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return None,
            Err(error) => {
                tracing::warn!(%error, path = %self.path.display(), "unable to read account selection");
                return None;
            }
        };
        match AccountType::from_str(raw.trim()) {
            Ok(account_type) => Some(account_type),
            Err(_) => {
                tracing::warn!(path = %self.path.display(), "unrecognized account selection on disk");
                None
            }
        }
    }

    fn store(&self, account_type: AccountType) {
        if let Err(error) = std::fs::write(&self.path, account_type.to_string()) {
            tracing::warn!(%error, path = %self.path.display(), "unable to persist account selection");
        }
    }
}
