//! Gateway process configuration.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{Context, Result, bail};
use url::Url;

/// Environment variable holding the OMDb API key (required).
pub const API_KEY_VAR: &str = "MOVIES_API_KEY";

/// Environment variable holding the listen port.
pub const PORT_VAR: &str = "PORT";

/// Environment variable overriding the OMDb base URL.
pub const BASE_URL_VAR: &str = "OMDB_BASE_URL";

/// Listen port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Gateway configuration, validated once at process entry.
#[derive(Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct GatewayConfig {
    /// OMDb API key.
    pub api_key: String,
    /// Listen port.
    pub port: u16,
    /// Upstream override (tests, proxies).
    pub omdb_base_url: Option<Url>,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"<redacted>")
            .field("port", &self.port)
            .field("omdb_base_url", &self.omdb_base_url.as_ref().map(Url::as_str))
            .finish()
    }
}

impl GatewayConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `MOVIES_API_KEY` is missing or empty, or if
    /// `PORT` / `OMDB_BASE_URL` are malformed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary lookup function.
    ///
    /// # Errors
    ///
    /// Same conditions as [`GatewayConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|k| !k.trim().is_empty())
            .with_context(|| format!("API key is missing: set {API_KEY_VAR}"))?;

        let port = match lookup(PORT_VAR).filter(|p| !p.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("invalid {PORT_VAR}: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let omdb_base_url = match lookup(BASE_URL_VAR).filter(|u| !u.trim().is_empty()) {
            Some(raw) => {
                let url = Url::parse(raw.trim())
                    .with_context(|| format!("invalid {BASE_URL_VAR}: {raw}"))?;
                if url.cannot_be_a_base() {
                    bail!("invalid {BASE_URL_VAR}: {raw} cannot be a base URL");
                }
                Some(url)
            }
            None => None,
        };

        Ok(Self {
            api_key,
            port,
            omdb_base_url,
        })
    }

    /// Overrides the listen port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Address the server binds to (all interfaces).
    #[must_use]
    pub const fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (String::from(*k), String::from(*v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        // Arrange & Act
        let result = GatewayConfig::from_lookup(lookup_from(&[("PORT", "8080")]));

        // Assert
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("MOVIES_API_KEY"));
    }

    #[test]
    fn test_blank_api_key_is_rejected() {
        // Arrange & Act
        let result = GatewayConfig::from_lookup(lookup_from(&[("MOVIES_API_KEY", "  ")]));

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn test_port_defaults_when_unset() {
        // Arrange & Act
        let config = GatewayConfig::from_lookup(lookup_from(&[("MOVIES_API_KEY", "k")])).unwrap();

        // Assert
        assert_eq!(config.api_key, "k");
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.omdb_base_url.is_none());
    }

    #[test]
    fn test_port_and_base_url_are_read() {
        // Arrange & Act
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("MOVIES_API_KEY", "k"),
            ("PORT", "8080"),
            ("OMDB_BASE_URL", "http://localhost:9999/"),
        ]))
        .unwrap();

        // Assert
        assert_eq!(config.port, 8080);
        assert_eq!(
            config.omdb_base_url.unwrap().as_str(),
            "http://localhost:9999/"
        );
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        // Arrange & Act
        let result = GatewayConfig::from_lookup(lookup_from(&[
            ("MOVIES_API_KEY", "k"),
            ("PORT", "eighty"),
        ]));

        // Assert
        assert!(result.unwrap_err().to_string().contains("invalid PORT"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        // Arrange
        let config =
            GatewayConfig::from_lookup(lookup_from(&[("MOVIES_API_KEY", "super-secret")])).unwrap();

        // Act
        let debug = format!("{config:?}");

        // Assert
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_listen_addr_uses_port() {
        // Arrange
        let config = GatewayConfig::from_lookup(lookup_from(&[("MOVIES_API_KEY", "k")]))
            .unwrap()
            .with_port(4321);

        // Act & Assert
        assert_eq!(config.listen_addr().port(), 4321);
    }
}
