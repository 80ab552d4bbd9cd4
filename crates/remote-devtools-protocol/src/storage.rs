//! Commands for the `Storage` domain.

use remote_devtools_core::{Command, EmptyReturns};
use serde::{Deserialize, Serialize};

/// Clears storage for an origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearDataForOrigin {
    /// Security origin.
    pub origin: String,
    /// Comma separated list of storage types to clear.
    pub storage_types: String,
}

impl ClearDataForOrigin {
    /// Clear `storage_types` (e.g. `"cookies,local_storage"` or `"all"`) for
    /// `origin`.
    #[must_use]
    pub fn new(origin: impl Into<String>, storage_types: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            storage_types: storage_types.into(),
        }
    }
}

impl Command for ClearDataForOrigin {
    const METHOD: &'static str = "Storage.clearDataForOrigin";
    type Returns = EmptyReturns;
}
