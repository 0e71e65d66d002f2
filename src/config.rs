//! Server configuration.
//!
//! Resolved once at startup with [`Config::from_env()`].
//!
//! # Environment Variables
//!
//! - `PORT` — Port to listen on (default: `8000`). Values that do not parse
//!   as a port number are ignored with a warning.

use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use log::warn;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`Config::from_env()`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup("PORT") {
            match raw.trim().parse() {
                Ok(port) => config.port = port,
                Err(e) => warn!(
                    "ignoring PORT={raw:?} ({e}), using {DEFAULT_PORT} instead"
                ),
            }
        }

        config
    }

    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
