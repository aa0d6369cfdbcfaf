// Configuration - environment driven, with defaults for local use

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "BDSuperstore.csv";
pub const DEFAULT_PORT: u16 = 8050;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub log_json: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            log_json: false,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}

impl DashboardConfig {
    /// Read `DASHBOARD_*` variables; unset or unparseable values keep defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env`, with an explicit variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            data_path: lookup("DASHBOARD_DATA_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            host: lookup("DASHBOARD_HOST")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.host),
            port: lookup("DASHBOARD_PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
            log_json: lookup("DASHBOARD_LOG_JSON")
                .and_then(|v| parse_bool(v.trim()))
                .unwrap_or(defaults.log_json),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
