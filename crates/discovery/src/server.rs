use std::net::IpAddr;

use mdns_sd::{ServiceDaemon, ServiceInfo};

use crate::DiscoveryError;
use crate::types::{NodeName, SERVICE_NAME, TXT_FULL_NAME, TXT_NAME, TXT_NAMESPACE};

/// Advertises one node on the local network via mDNS/DNS-SD.
pub struct Announcer {
    node: NodeName,
    instance: String,
    service_type: String,
    port: u16,
    ips: Vec<IpAddr>,
    daemon: Option<ServiceDaemon>,
}

impl Announcer {
    /// Creates an announcer for `node` reachable on `port`.
    ///
    /// The mDNS instance name defaults to `<name>-<port>`; use
    /// [`with_instance`](Self::with_instance) when several processes on one
    /// host announce the same node name.
    pub fn new(node: NodeName, port: u16) -> Self {
        let instance = format!("{}-{port}", node.name());
        Self {
            node,
            instance,
            service_type: SERVICE_NAME.into(),
            port,
            ips: Vec::new(),
            daemon: None,
        }
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = service_type.into();
        self
    }

    /// Advertises these addresses instead of the detected local ones.
    pub fn with_ips(mut self, ips: Vec<IpAddr>) -> Self {
        self.ips = ips;
        self
    }

    pub fn node(&self) -> &NodeName {
        &self.node
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    pub fn is_running(&self) -> bool {
        self.daemon.is_some()
    }

    fn service_domain(&self) -> String {
        format!("{}.local.", self.service_type.trim_end_matches('.'))
    }

    /// Begins advertising the node on the network.
    ///
    /// The port must be non-zero. Calling it again re-registers.
    pub fn start(&mut self) -> Result<(), DiscoveryError> {
        if self.port == 0 {
            return Err(DiscoveryError::Config(
                "port must be set before announcing a node".into(),
            ));
        }

        self.stop();

        let ips = if self.ips.is_empty() {
            get_local_ips()
        } else {
            self.ips.clone()
        };

        if ips.is_empty() {
            return Err(DiscoveryError::Network("no valid network IPs found".into()));
        }

        let service = self.service_info(&ips)?;
        let full_name = service.get_fullname().to_string();

        // The record is complete before any daemon exists, so failing here
        // leaves nothing running.
        let daemon = ServiceDaemon::new().map_err(|e| {
            DiscoveryError::Unavailable(format!("failed to create mDNS daemon: {e}"))
        })?;

        if let Err(e) = daemon.register(service) {
            let _ = daemon.shutdown();
            return Err(DiscoveryError::Unavailable(format!(
                "failed to register mDNS service '{full_name}': {e}"
            )));
        }

        tracing::info!(node = %self.node, instance = %full_name, "announcing node");
        self.daemon = Some(daemon);
        Ok(())
    }

    /// Builds the DNS-SD record: TXT `full_name` carries the exact node
    /// name, `namespace` and `name` its two halves.
    fn service_info(&self, ips: &[IpAddr]) -> Result<ServiceInfo, DiscoveryError> {
        let properties = [
            (TXT_FULL_NAME, self.node.full_name()),
            (TXT_NAMESPACE, self.node.namespace()),
            (TXT_NAME, self.node.name()),
        ];

        ServiceInfo::new(
            &self.service_domain(),
            &self.instance,
            &get_hostname(),
            ips,
            self.port,
            &properties[..],
        )
        .map_err(|e| DiscoveryError::Config(format!("failed to create service info: {e}")))
    }

    /// Stops advertising the node.
    pub fn stop(&mut self) {
        if let Some(daemon) = self.daemon.take() {
            let full_name = format!("{}.{}", self.instance, self.service_domain());
            let _ = daemon.unregister(&full_name);
            let _ = daemon.shutdown();
            tracing::debug!(instance = %full_name, "stopped announcing node");
        }
    }
}

impl Drop for Announcer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Returns local non-loopback IPv4 addresses, excluding link-local (169.254.x.x).
pub fn get_local_ips() -> Vec<IpAddr> {
    let Ok(interfaces) = if_addrs::get_if_addrs() else {
        return Vec::new();
    };

    interfaces
        .into_iter()
        .filter(|iface| !iface.is_loopback())
        .filter_map(|iface| match iface.ip() {
            IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_link_local() => Some(IpAddr::V4(v4)),
            _ => None,
        })
        .collect()
}

/// Returns the local hostname suffixed with `.local.` as required by mDNS.
pub fn get_hostname() -> String {
    let mut name = hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".into());

    if !name.ends_with(".local.") {
        name = name.trim_end_matches('.').to_string();
        name.push_str(".local.");
    }
    name
}
