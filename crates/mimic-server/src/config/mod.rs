//! Configuration types for the mimic server.

mod listen;

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub use listen::{AdminConfig, ListenConfig};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    /// Directory of JSON mapping documents registered at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappings_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ServerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.listen
            .host
            .parse::<IpAddr>()
            .with_context(|| format!("Invalid listen host '{}'", self.listen.host))?;

        if self.listen.port != 0 && self.listen.port == self.admin.port {
            anyhow::bail!(
                "Stub port and admin port must differ (both set to {})",
                self.listen.port
            );
        }

        if let Some(ref dir) = self.mappings_dir {
            if !dir.is_dir() {
                anyhow::bail!("Mappings directory '{}' does not exist", dir.display());
            }
        }

        Ok(())
    }

    /// Address of the stub traffic listener
    pub fn stub_addr(&self) -> Result<SocketAddr, anyhow::Error> {
        socket_addr(&self.listen.host, self.listen.port)
    }

    /// Address of the admin API listener
    pub fn admin_addr(&self) -> Result<SocketAddr, anyhow::Error> {
        socket_addr(&self.listen.host, self.admin.port)
    }

    /// Config bound to ephemeral ports on localhost
    pub fn ephemeral() -> Self {
        Self {
            listen: ListenConfig {
                port: 0,
                ..ListenConfig::default()
            },
            admin: AdminConfig { port: 0 },
            mappings_dir: None,
        }
    }
}

fn socket_addr(host: &str, port: u16) -> Result<SocketAddr, anyhow::Error> {
    let ip: IpAddr = host
        .parse()
        .with_context(|| format!("Invalid listen host '{host}'"))?;
    Ok(SocketAddr::new(ip, port))
}
