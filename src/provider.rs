use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::configapi::{ConfigApiError, ConfigClient};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("missing provider setting '{setting}' (set {flag} or {env})")]
    MissingSetting {
        setting: &'static str,
        flag: &'static str,
        env: &'static str,
    },
    #[error("invalid https_host '{0}': expected an http:// or https:// URL")]
    InvalidHost(String),
    #[error("invalid product version '{0}'")]
    InvalidVersion(String),
    #[error("unsupported product version '{version}', supported versions are: {supported}")]
    UnsupportedVersion { version: String, supported: String },
}

/// A four-part directory server version such as `9.2.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductVersion([u16; 4]);

impl ProductVersion {
    pub const V9_1: Self = Self([9, 1, 0, 0]);
    pub const V9_2: Self = Self([9, 2, 0, 0]);
    pub const V9_3: Self = Self([9, 3, 0, 0]);
    pub const V10_0: Self = Self([10, 0, 0, 0]);

    pub const SUPPORTED: &'static [ProductVersion] = &[Self::V9_1, Self::V9_2, Self::V9_3, Self::V10_0];

    pub const OLDEST: Self = Self::V9_1;
    pub const LATEST: Self = Self::V10_0;

    /// Parses `9.2`, `9.2.0` or `9.2.0.0`, padding missing parts with zeros.
    pub fn parse(input: &str) -> Result<Self, ProviderError> {
        let parts: Vec<&str> = input.trim().split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(ProviderError::InvalidVersion(input.to_string()));
        }

        let mut numbers = [0u16; 4];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| ProviderError::InvalidVersion(input.to_string()))?;
        }

        let version = Self(numbers);
        if !Self::SUPPORTED.contains(&version) {
            return Err(ProviderError::UnsupportedVersion {
                version: version.to_string(),
                supported: Self::SUPPORTED
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        Ok(version)
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [major, minor, patch, build] = self.0;
        write!(f, "{major}.{minor}.{patch}.{build}")
    }
}

impl FromStr for ProductVersion {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Connection settings for the directory server.
#[derive(Clone)]
pub struct ProviderConfig {
    pub https_host: String,
    pub username: String,
    pub password: String,
    pub insecure_trust_all_tls: bool,
    pub product_version: ProductVersion,
}

impl ProviderConfig {
    pub fn new(
        https_host: Option<String>,
        username: Option<String>,
        password: Option<String>,
        insecure_trust_all_tls: bool,
        product_version: Option<String>,
    ) -> Result<Self, ProviderError> {
        let https_host = https_host.ok_or(ProviderError::MissingSetting {
            setting: "https_host",
            flag: "--https-host",
            env: "PINGDIRECTORY_PROVIDER_HTTPS_HOST",
        })?;
        if !(https_host.starts_with("https://") || https_host.starts_with("http://")) {
            return Err(ProviderError::InvalidHost(https_host));
        }
        if https_host.starts_with("http://") {
            tracing::warn!(%https_host, "connecting to the config API without TLS");
        }

        let username = username.ok_or(ProviderError::MissingSetting {
            setting: "username",
            flag: "--username",
            env: "PINGDIRECTORY_PROVIDER_USERNAME",
        })?;
        let password = password.ok_or(ProviderError::MissingSetting {
            setting: "password",
            flag: "--password",
            env: "PINGDIRECTORY_PROVIDER_PASSWORD",
        })?;
        let product_version = product_version
            .ok_or(ProviderError::MissingSetting {
                setting: "product_version",
                flag: "--product-version",
                env: "PINGDIRECTORY_PROVIDER_PRODUCT_VERSION",
            })?
            .parse()?;

        Ok(Self {
            https_host,
            username,
            password,
            insecure_trust_all_tls,
            product_version,
        })
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("https_host", &self.https_host)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("insecure_trust_all_tls", &self.insecure_trust_all_tls)
            .field("product_version", &self.product_version)
            .finish()
    }
}

/// What every lifecycle call receives once the provider is configured.
#[derive(Debug, Clone)]
pub struct ProviderContext {
    pub client: ConfigClient,
    pub product_version: ProductVersion,
}

impl ProviderContext {
    pub fn new(client: ConfigClient, product_version: ProductVersion) -> Self {
        Self {
            client,
            product_version,
        }
    }

    pub fn configure(config: &ProviderConfig) -> Result<Self, ConfigApiError> {
        let client = ConfigClient::new(config)?;
        tracing::debug!(
            host = %config.https_host,
            version = %config.product_version,
            "provider configured"
        );
        Ok(Self::new(client, config.product_version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pads_short_versions() {
        assert_eq!(ProductVersion::parse("9.2").unwrap(), ProductVersion::V9_2);
        assert_eq!(ProductVersion::parse("9.3.0").unwrap(), ProductVersion::V9_3);
        assert_eq!(ProductVersion::parse("10.0.0.0").unwrap(), ProductVersion::V10_0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            ProductVersion::parse("9"),
            Err(ProviderError::InvalidVersion(_))
        ));
        assert!(matches!(
            ProductVersion::parse("9.x"),
            Err(ProviderError::InvalidVersion(_))
        ));
        assert!(matches!(
            ProductVersion::parse("9.1.0.0.0"),
            Err(ProviderError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unsupported() {
        let err = ProductVersion::parse("8.3").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported product version '8.3.0.0', supported versions are: 9.1.0.0, 9.2.0.0, 9.3.0.0, 10.0.0.0"
        );
    }

    #[test]
    fn test_version_ordering() {
        assert!(ProductVersion::V9_1 < ProductVersion::V9_2);
        assert!(ProductVersion::V9_3 < ProductVersion::V10_0);
        assert_eq!(ProductVersion::OLDEST, ProductVersion::SUPPORTED[0]);
    }

    fn config(host: Option<&str>, version: Option<&str>) -> Result<ProviderConfig, ProviderError> {
        ProviderConfig::new(
            host.map(str::to_string),
            Some("cn=administrator".to_string()),
            Some("secret_password".to_string()),
            false,
            version.map(str::to_string),
        )
    }

    #[test]
    fn test_config_requires_host() {
        let err = config(None, Some("9.3")).unwrap_err();
        assert!(err.to_string().contains("PINGDIRECTORY_PROVIDER_HTTPS_HOST"));
    }

    #[test]
    fn test_config_rejects_hostname_without_scheme() {
        assert!(matches!(
            config(Some("localhost:1443"), Some("9.3")),
            Err(ProviderError::InvalidHost(_))
        ));
    }

    #[test]
    fn test_config_requires_version() {
        let err = config(Some("https://localhost:1443"), None).unwrap_err();
        assert!(err.to_string().contains("--product-version"));
    }

    #[test]
    fn test_config_debug_redacts_password() {
        let config = config(Some("https://localhost:1443"), Some("9.2")).unwrap();
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains("secret_password"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
