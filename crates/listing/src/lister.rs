use std::collections::HashMap;

use nodelist_discovery::Discovery;
use nodelist_fingerprint::Fingerprint;

use crate::error::ListError;

/// Which nodes a listing includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    /// Visible nodes only.
    #[default]
    Default,
    /// Visible and hidden nodes.
    IncludeHidden,
}

impl Visibility {
    pub fn include_hidden(self) -> bool {
        matches!(self, Visibility::IncludeHidden)
    }
}

impl From<bool> for Visibility {
    fn from(include_hidden: bool) -> Self {
        if include_hidden {
            Visibility::IncludeHidden
        } else {
            Visibility::Default
        }
    }
}

/// A node's full name paired with its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedNode {
    pub full_name: String,
    pub fingerprint: Fingerprint,
}

impl ListedNode {
    pub fn new(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let fingerprint = Fingerprint::of(&full_name);
        Self {
            full_name,
            fingerprint,
        }
    }
}

/// Distinct full names that share one fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub fingerprint: Fingerprint,
    pub names: Vec<String>,
}

/// One snapshot of the graph, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub entries: Vec<ListedNode>,
}

impl Listing {
    /// Fingerprints each name, keeping order and duplicates.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: names.into_iter().map(ListedNode::new).collect(),
        }
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fingerprints shared by more than one distinct name.
    ///
    /// Repeated identical names are duplicates, not collisions. Collisions
    /// come back ordered by the first appearance of their fingerprint.
    pub fn collisions(&self) -> Vec<Collision> {
        let mut order: Vec<Fingerprint> = Vec::new();
        let mut by_fp: HashMap<Fingerprint, Vec<&str>> = HashMap::new();

        for entry in &self.entries {
            let names = by_fp.entry(entry.fingerprint).or_insert_with(|| {
                order.push(entry.fingerprint);
                Vec::new()
            });
            if !names.contains(&entry.full_name.as_str()) {
                names.push(&entry.full_name);
            }
        }

        order
            .into_iter()
            .filter_map(|fp| {
                let names = by_fp.remove(&fp)?;
                (names.len() > 1).then(|| Collision {
                    fingerprint: fp,
                    names: names.into_iter().map(String::from).collect(),
                })
            })
            .collect()
    }
}

/// Takes one snapshot from `discovery` and fingerprints every node.
///
/// The session is opened for the single query and dropped before any
/// fingerprinting happens. Any discovery failure aborts the whole listing.
pub fn list_nodes(
    discovery: &dyn Discovery,
    visibility: Visibility,
) -> Result<Listing, ListError> {
    let names = {
        let mut session = discovery.open_session()?;
        session.node_names(visibility.include_hidden())?
    };

    let listing = Listing::from_names(names.iter().map(|n| n.full_name()));
    tracing::debug!(
        count = listing.count(),
        include_hidden = visibility.include_hidden(),
        "listed nodes"
    );

    for collision in listing.collisions() {
        tracing::warn!(
            fingerprint = %collision.fingerprint,
            names = ?collision.names,
            "distinct node names share a fingerprint"
        );
    }

    Ok(listing)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use nodelist_discovery::{
        DiscoveryError, DiscoverySession, NodeName, StaticDiscovery, filter_hidden,
    };

    use super::*;

    /// Test back-end that counts open and closed sessions.
    struct Tracked {
        nodes: Vec<NodeName>,
        fail_open: bool,
        fail_query: bool,
        opened: Arc<AtomicUsize>,
        closed: Arc<AtomicUsize>,
    }

    impl Tracked {
        fn new(names: &[&str]) -> Self {
            Self {
                nodes: names.iter().map(|n| NodeName::parse(*n)).collect(),
                fail_open: false,
                fail_query: false,
                opened: Arc::new(AtomicUsize::new(0)),
                closed: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    struct TrackedSession<'a> {
        owner: &'a Tracked,
    }

    impl Discovery for Tracked {
        fn open_session(&self) -> Result<Box<dyn DiscoverySession + '_>, DiscoveryError> {
            if self.fail_open {
                return Err(DiscoveryError::Unavailable("daemon unreachable".into()));
            }
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(TrackedSession { owner: self }))
        }
    }

    impl DiscoverySession for TrackedSession<'_> {
        fn node_names(&mut self, include_hidden: bool) -> Result<Vec<NodeName>, DiscoveryError> {
            if self.owner.fail_query {
                return Err(DiscoveryError::Unavailable("query timed out".into()));
            }
            Ok(filter_hidden(self.owner.nodes.clone(), include_hidden))
        }
    }

    impl Drop for TrackedSession<'_> {
        fn drop(&mut self) {
            self.owner.closed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn full_names(listing: &Listing) -> Vec<&str> {
        listing.entries.iter().map(|e| e.full_name.as_str()).collect()
    }

    #[test]
    fn pairs_names_with_fingerprints_in_discovery_order() {
        let discovery = StaticDiscovery::from_full_names(["/talker", "/listener"]);
        let listing = list_nodes(&discovery, Visibility::Default).unwrap();

        assert_eq!(full_names(&listing), ["/talker", "/listener"]);
        assert_eq!(listing.entries[0].fingerprint.to_string(), "3208E151");
        assert_eq!(listing.entries[1].fingerprint.to_string(), "3FA04509");
    }

    #[test]
    fn hidden_nodes_only_when_requested() {
        let discovery = StaticDiscovery::from_full_names(["/talker", "/_daemon"]);

        let visible = list_nodes(&discovery, Visibility::Default).unwrap();
        assert_eq!(full_names(&visible), ["/talker"]);

        let all = list_nodes(&discovery, Visibility::IncludeHidden).unwrap();
        assert_eq!(full_names(&all), ["/talker", "/_daemon"]);
    }

    #[test]
    fn duplicates_are_preserved() {
        let discovery = StaticDiscovery::from_full_names(["/b", "/a", "/b"]);
        let listing = list_nodes(&discovery, Visibility::Default).unwrap();

        assert_eq!(full_names(&listing), ["/b", "/a", "/b"]);
        assert_eq!(listing.entries[0], listing.entries[2]);
        assert!(listing.collisions().is_empty());
    }

    #[test]
    fn session_released_after_listing() {
        let discovery = Tracked::new(&["/talker"]);
        list_nodes(&discovery, Visibility::Default).unwrap();

        assert_eq!(discovery.opened.load(Ordering::SeqCst), 1);
        assert_eq!(discovery.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn session_released_when_query_fails() {
        let mut discovery = Tracked::new(&["/talker"]);
        discovery.fail_query = true;

        let err = list_nodes(&discovery, Visibility::Default).unwrap_err();
        assert!(matches!(err, ListError::DiscoveryUnavailable(_)));
        assert_eq!(discovery.opened.load(Ordering::SeqCst), 1);
        assert_eq!(discovery.closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn open_failure_is_discovery_unavailable() {
        let mut discovery = Tracked::new(&["/talker"]);
        discovery.fail_open = true;

        let err = list_nodes(&discovery, Visibility::IncludeHidden).unwrap_err();
        assert!(matches!(err, ListError::DiscoveryUnavailable(_)));
        assert!(err.to_string().contains("daemon unreachable"));
        assert_eq!(discovery.opened.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn repeated_listings_are_identical() {
        let discovery = StaticDiscovery::from_full_names(["/talker", "/listener", "/_d"]);
        for visibility in [Visibility::Default, Visibility::IncludeHidden] {
            let first = list_nodes(&discovery, visibility).unwrap();
            let second = list_nodes(&discovery, visibility).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn visibility_from_flag() {
        assert_eq!(Visibility::from(true), Visibility::IncludeHidden);
        assert_eq!(Visibility::from(false), Visibility::Default);
        assert_eq!(Visibility::default(), Visibility::Default);
    }

    #[test]
    fn collisions_group_distinct_names() {
        let fp = Fingerprint::from_u32(0xabc);
        let listing = Listing {
            entries: vec![
                ListedNode {
                    full_name: "/x".into(),
                    fingerprint: fp,
                },
                ListedNode::new("/talker"),
                ListedNode {
                    full_name: "/y".into(),
                    fingerprint: fp,
                },
                ListedNode {
                    full_name: "/x".into(),
                    fingerprint: fp,
                },
            ],
        };

        let collisions = listing.collisions();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].fingerprint, fp);
        assert_eq!(collisions[0].names, ["/x", "/y"]);
    }
}
