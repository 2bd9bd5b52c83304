use std::fmt;
use std::time::{Duration, Instant};

use mdns_sd::{Receiver, ServiceDaemon, ServiceEvent};

use crate::types::{
    DEFAULT_BROWSE_TIMEOUT, NodeName, SERVICE_NAME, TXT_FULL_NAME, TXT_NAME, TXT_NAMESPACE,
    filter_hidden,
};
use crate::{Discovery, DiscoveryError, DiscoverySession};

/// Discovers nodes on the local network via mDNS/DNS-SD.
#[derive(Debug, Clone)]
pub struct MdnsDiscovery {
    service_type: String,
    browse_timeout: Duration,
}

impl MdnsDiscovery {
    /// Creates a client browsing the default service type.
    pub fn new() -> Self {
        Self {
            service_type: SERVICE_NAME.into(),
            browse_timeout: DEFAULT_BROWSE_TIMEOUT,
        }
    }

    /// Browses `service_type` (e.g. `_nodelist._tcp`) instead of the default.
    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = service_type.into();
        self
    }

    /// Sets how long a session collects answers.
    pub fn with_browse_timeout(mut self, timeout: Duration) -> Self {
        self.browse_timeout = timeout;
        self
    }

    pub fn browse_timeout(&self) -> Duration {
        self.browse_timeout
    }

    /// Fully-qualified browse domain, e.g. `_nodelist._tcp.local.`.
    pub fn service_domain(&self) -> String {
        format!("{}.local.", self.service_type.trim_end_matches('.'))
    }
}

impl Default for MdnsDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl Discovery for MdnsDiscovery {
    fn open_session(&self) -> Result<Box<dyn DiscoverySession + '_>, DiscoveryError> {
        let daemon = ServiceDaemon::new().map_err(|e| {
            DiscoveryError::Unavailable(format!("failed to create mDNS daemon: {e}"))
        })?;

        // From here on the session owns the daemon, so every early return
        // goes through its Drop.
        let mut session = MdnsSession {
            daemon,
            service_domain: self.service_domain(),
            browse_timeout: self.browse_timeout,
            receiver: None,
            resolved: None,
        };

        let receiver = session.daemon.browse(&session.service_domain).map_err(|e| {
            DiscoveryError::Unavailable(format!(
                "failed to browse '{}': {e}",
                session.service_domain
            ))
        })?;
        session.receiver = Some(receiver);

        tracing::debug!(domain = %session.service_domain, "opened mDNS discovery session");
        Ok(Box::new(session))
    }
}

struct MdnsSession {
    daemon: ServiceDaemon,
    service_domain: String,
    browse_timeout: Duration,
    receiver: Option<Receiver<ServiceEvent>>,
    resolved: Option<Vec<NodeName>>,
}

impl MdnsSession {
    /// Collects resolved instances until the browse window closes.
    fn collect(&self) -> Result<Vec<NodeName>, DiscoveryError> {
        let Some(receiver) = self.receiver.as_ref() else {
            return Err(DiscoveryError::Unavailable("mDNS browse not started".into()));
        };

        let deadline = Instant::now() + self.browse_timeout;
        let nodes = collect_until(
            |remaining| receiver.recv_timeout(remaining),
            &self.service_domain,
            deadline,
        )?;

        tracing::debug!(count = nodes.len(), "mDNS browse window closed");
        Ok(nodes)
    }
}

/// Nodes seen during one browse window, keyed by mDNS instance.
#[derive(Debug, Default)]
struct Resolved {
    entries: Vec<(String, NodeName)>,
}

impl Resolved {
    fn apply(&mut self, event: &ServiceEvent, service_domain: &str) {
        match event {
            ServiceEvent::ServiceResolved(_) => {
                let Some((instance, node)) = resolve_node(event, service_domain) else {
                    return;
                };
                // Repeated answers for one instance are the same node;
                // distinct instances sharing a name are kept.
                match self.entries.iter_mut().find(|(i, _)| *i == instance) {
                    Some(entry) => entry.1 = node,
                    None => self.entries.push((instance, node)),
                }
            }
            ServiceEvent::ServiceRemoved(_, fullname) => {
                self.entries.retain(|(i, _)| i != fullname);
            }
            _ => {}
        }
    }

    fn into_nodes(self) -> Vec<NodeName> {
        self.entries.into_iter().map(|(_, node)| node).collect()
    }
}

/// Feeds events from `recv` into a [`Resolved`] set until `deadline`.
///
/// `recv` is called with the time left in the window. An error before the
/// deadline means the event stream ended early.
fn collect_until<E: fmt::Display>(
    mut recv: impl FnMut(Duration) -> Result<ServiceEvent, E>,
    service_domain: &str,
    deadline: Instant,
) -> Result<Vec<NodeName>, DiscoveryError> {
    let mut resolved = Resolved::default();

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        match recv(remaining) {
            Ok(event) => resolved.apply(&event, service_domain),
            Err(_) if Instant::now() >= deadline => break,
            Err(e) => {
                return Err(DiscoveryError::Unavailable(format!(
                    "mDNS browse ended early: {e}"
                )));
            }
        }
    }

    Ok(resolved.into_nodes())
}

impl DiscoverySession for MdnsSession {
    fn node_names(&mut self, include_hidden: bool) -> Result<Vec<NodeName>, DiscoveryError> {
        let nodes = match &self.resolved {
            Some(nodes) => nodes.clone(),
            None => {
                let nodes = self.collect()?;
                self.resolved = Some(nodes.clone());
                nodes
            }
        };
        Ok(filter_hidden(nodes, include_hidden))
    }
}

impl Drop for MdnsSession {
    fn drop(&mut self) {
        if self.receiver.take().is_some() {
            let _ = self.daemon.stop_browse(&self.service_domain);
        }
        let _ = self.daemon.shutdown();
        tracing::debug!(domain = %self.service_domain, "closed mDNS discovery session");
    }
}

/// Extracts the instance name and node identity from a resolved service.
///
/// The `full_name` TXT record is used verbatim when present. Otherwise the
/// name is joined from the `namespace` and `name` records; a missing `name`
/// falls back to the instance name, a missing namespace to `/`.
fn resolve_node(event: &ServiceEvent, service_domain: &str) -> Option<(String, NodeName)> {
    let ServiceEvent::ServiceResolved(info) = event else {
        return None;
    };

    let fullname = info.get_fullname().to_string();

    if let Some(full_name) = info
        .get_property_val_str(TXT_FULL_NAME)
        .filter(|v| !v.is_empty())
    {
        let node = NodeName::parse(full_name);
        return Some((fullname, node));
    }

    let instance = fullname
        .strip_suffix(service_domain)
        .map(|s| s.trim_end_matches('.'))
        .unwrap_or(&fullname);

    let name = info
        .get_property_val_str(TXT_NAME)
        .filter(|v| !v.is_empty())
        .unwrap_or(instance);
    let namespace = info
        .get_property_val_str(TXT_NAMESPACE)
        .filter(|v| !v.is_empty())
        .unwrap_or("/");

    let node = NodeName::new(namespace, name);
    Some((fullname, node))
}
