use crate::types::{NodeName, filter_hidden};
use crate::{Discovery, DiscoveryError, DiscoverySession};

/// Discovery over a fixed, preconfigured list of nodes.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    nodes: Vec<NodeName>,
}

impl StaticDiscovery {
    pub fn new(nodes: Vec<NodeName>) -> Self {
        Self { nodes }
    }

    /// Builds the list from full names such as `/ns/talker`.
    ///
    /// Names are kept byte for byte. Empty entries name no node and are
    /// skipped.
    pub fn from_full_names<I, S>(full_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let nodes = full_names
            .into_iter()
            .enumerate()
            .filter_map(|(index, n)| {
                let n = n.as_ref();
                if n.is_empty() {
                    tracing::warn!(index, "skipping empty node name in static node list");
                    return None;
                }
                Some(NodeName::parse(n))
            })
            .collect();
        Self::new(nodes)
    }

    pub fn nodes(&self) -> &[NodeName] {
        &self.nodes
    }
}

impl Discovery for StaticDiscovery {
    fn open_session(&self) -> Result<Box<dyn DiscoverySession + '_>, DiscoveryError> {
        tracing::debug!(nodes = self.nodes.len(), "opened static discovery session");
        Ok(Box::new(StaticSession { nodes: &self.nodes }))
    }
}

struct StaticSession<'a> {
    nodes: &'a [NodeName],
}

impl DiscoverySession for StaticSession<'_> {
    fn node_names(&mut self, include_hidden: bool) -> Result<Vec<NodeName>, DiscoveryError> {
        Ok(filter_hidden(self.nodes.to_vec(), include_hidden))
    }
}
