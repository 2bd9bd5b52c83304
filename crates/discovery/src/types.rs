use std::fmt;
use std::time::Duration;

/// mDNS service type under which nodes announce themselves.
pub const SERVICE_NAME: &str = "_nodelist._tcp";

/// How long an mDNS session collects answers before reporting.
pub const DEFAULT_BROWSE_TIMEOUT: Duration = Duration::from_millis(1500);

/// TXT record key carrying the node's full name, byte for byte.
pub const TXT_FULL_NAME: &str = "full_name";

/// TXT record key carrying the node namespace.
pub const TXT_NAMESPACE: &str = "namespace";

/// TXT record key carrying the node base name.
pub const TXT_NAME: &str = "name";

/// Fully-qualified identity of a node.
///
/// The full name is opaque: it is kept exactly as discovered and printed and
/// fingerprinted as is. Namespace and base name are views into it. Two nodes
/// may carry the same identity; nothing here assumes uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeName {
    full_name: String,
}

impl NodeName {
    /// Joins namespace and base name with exactly one `/`.
    pub fn new(namespace: &str, name: &str) -> Self {
        let namespace = namespace.trim_end_matches('/');
        let full_name = if namespace.starts_with('/') {
            format!("{namespace}/{name}")
        } else if namespace.is_empty() {
            format!("/{name}")
        } else {
            format!("/{namespace}/{name}")
        };
        Self { full_name }
    }

    /// Wraps a full name such as `/ns/talker` without rewriting it.
    pub fn parse(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Everything before the last `/`; `/` when that is the root.
    pub fn namespace(&self) -> &str {
        match self.full_name.rfind('/') {
            Some(0) | None => "/",
            Some(idx) => &self.full_name[..idx],
        }
    }

    /// Everything after the last `/`.
    pub fn name(&self) -> &str {
        match self.full_name.rfind('/') {
            Some(idx) => &self.full_name[idx + 1..],
            None => &self.full_name,
        }
    }

    /// Hidden nodes have a base name starting with `_`.
    pub fn is_hidden(&self) -> bool {
        self.name().starts_with('_')
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// Drops hidden nodes unless `include_hidden` is set. Order is preserved.
pub fn filter_hidden(names: Vec<NodeName>, include_hidden: bool) -> Vec<NodeName> {
    if include_hidden {
        return names;
    }
    names.into_iter().filter(|n| !n.is_hidden()).collect()
}
