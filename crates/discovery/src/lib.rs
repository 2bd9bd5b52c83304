//! Node discovery back-ends.
//!
//! Discovery is reached through the [`Discovery`] capability: open a scoped
//! [`DiscoverySession`], ask it for the current node names, drop it. Sessions
//! release whatever they hold (sockets, daemons) when dropped, on success and
//! on error alike.

pub mod client;
pub mod fixed;
pub mod server;
pub mod types;

// Re-export primary types.
pub use client::MdnsDiscovery;
pub use fixed::StaticDiscovery;
pub use server::{Announcer, get_hostname, get_local_ips};
pub use types::{
    DEFAULT_BROWSE_TIMEOUT, NodeName, SERVICE_NAME, TXT_FULL_NAME, TXT_NAME, TXT_NAMESPACE,
    filter_hidden,
};

/// Errors for discovery operations.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("discovery unavailable: {0}")]
    Unavailable(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// A source of node names.
pub trait Discovery {
    /// Opens a session against the discovery service.
    ///
    /// The session holds its resources until it is dropped.
    fn open_session(&self) -> Result<Box<dyn DiscoverySession + '_>, DiscoveryError>;
}

/// One scoped connection to a discovery service.
pub trait DiscoverySession {
    /// Returns the current node names in discovery order.
    ///
    /// Hidden nodes are left out unless `include_hidden` is set.
    fn node_names(&mut self, include_hidden: bool) -> Result<Vec<NodeName>, DiscoveryError>;
}
