//! Configuration for the node lister.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/nodelist/config.toml`
//! - Windows: `%APPDATA%/nodelist/config.toml`
//!
//! `NODELIST_CONFIG` overrides the location. A missing file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use nodelist_discovery::{Discovery, MdnsDiscovery, SERVICE_NAME, StaticDiscovery};
use nodelist_listing::HexStyle;
use serde::{Deserialize, Serialize};

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "NODELIST_CONFIG";

/// Lister configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Which discovery back-end to query, and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    #[serde(default)]
    pub backend: Backend,

    /// mDNS service type to browse.
    #[serde(default = "default_service_type")]
    pub service_type: String,

    /// mDNS browse window in milliseconds.
    #[serde(default = "default_browse_timeout_ms")]
    pub browse_timeout_ms: u64,

    /// Full node names served by the static back-end.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Mdns,
    Static,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Print fingerprints as eight zero-padded digits.
    #[serde(default)]
    pub padded_fingerprints: bool,
}

fn default_service_type() -> String {
    SERVICE_NAME.into()
}

fn default_browse_timeout_ms() -> u64 {
    1500
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            service_type: default_service_type(),
            browse_timeout_ms: default_browse_timeout_ms(),
            nodes: Vec::new(),
        }
    }
}

impl DiscoveryConfig {
    /// Builds the configured discovery back-end.
    pub fn build(&self) -> Box<dyn Discovery> {
        match self.backend {
            Backend::Mdns => Box::new(
                MdnsDiscovery::new()
                    .with_service_type(&self.service_type)
                    .with_browse_timeout(Duration::from_millis(self.browse_timeout_ms)),
            ),
            Backend::Static => Box::new(StaticDiscovery::from_full_names(&self.nodes)),
        }
    }
}

impl OutputConfig {
    pub fn hex_style(&self) -> HexStyle {
        if self.padded_fingerprints {
            HexStyle::Padded
        } else {
            HexStyle::Compact
        }
    }
}

impl Config {
    /// Loads configuration from `explicit`, `$NODELIST_CONFIG` or the
    /// platform default, in that order.
    ///
    /// An explicitly named file must exist; the default one may be absent.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load_from(Path::new(&path));
        }

        let path = config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    /// Parses the TOML file at `path`.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config {}: {e}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {e}", path.display()))?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        PathBuf::from(appdata).join("nodelist").join("config.toml")
    }

    #[cfg(not(target_os = "windows"))]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home)
            .join(".config")
            .join("nodelist")
            .join("config.toml")
    }
}
