//! Error types for node listing.

use nodelist_discovery::DiscoveryError;

/// Errors produced while listing nodes.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    /// The discovery session could not be opened or its query failed.
    #[error("cannot list nodes: {0}")]
    DiscoveryUnavailable(#[from] DiscoveryError),
}
