//! Lists discovered nodes together with their fingerprints.
//!
//! [`list_nodes`] takes one snapshot from a [`Discovery`] back-end and pairs
//! every node's full name with its [`Fingerprint`]. [`render`] prints the
//! result either as one `<full_name> (<HEX>)` line per node or as a bare count.
//!
//! [`Discovery`]: nodelist_discovery::Discovery
//! [`Fingerprint`]: nodelist_fingerprint::Fingerprint

pub mod error;
pub mod lister;
pub mod render;

pub use error::ListError;
pub use lister::{Collision, ListedNode, Listing, Visibility, list_nodes};
pub use render::{HexStyle, OutputMode, render};
