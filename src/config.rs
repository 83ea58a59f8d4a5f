//! Configuration Management
//!
//! Credentials and service endpoints, read from a YAML file and overlaid by
//! the usual `OS_*` environment variables.
//!
//! ```yaml
//! auth_url: https://keystone.example.com:5000/v3
//! username: demo
//! password: secret
//! project_name: demo
//! endpoints:
//!   network: https://neutron.example.com:9696
//!   orchestration: https://heat.example.com:8004/v1/6f70656e737461636b20342065766572
//! ```

use crate::error::{Error, Result};
use crate::openstack::auth::{AuthMethod, PasswordAuth};
use crate::openstack::client::{OpenStackClient, Service};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_DOMAIN: &str = "Default";

/// User configuration
#[derive(Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub auth_url: Option<String>,
    /// Pre-issued token; takes precedence over password credentials
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub user_domain_name: Option<String>,
    #[serde(default)]
    pub project_domain_name: Option<String>,
    /// Service type (`network`, `orchestration`, ...) to base URL
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |secret: &Option<String>| secret.as_ref().map(|_| "<redacted>");
        f.debug_struct("Config")
            .field("auth_url", &self.auth_url)
            .field("token", &redact(&self.token))
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("project_name", &self.project_name)
            .field("user_domain_name", &self.user_domain_name)
            .field("project_domain_name", &self.project_domain_name)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("osapi").join("config.yaml"))
    }

    /// Load configuration from the default location, falling back to an
    /// empty configuration when the file is missing or unreadable
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::Config(format!("invalid YAML: {}", e)))
    }

    /// Overlay `OS_*` environment variables
    pub fn with_env(self) -> Self {
        self.with_vars(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
    }

    /// Overlay variables from an arbitrary lookup (the environment in production)
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let overlay = |field: &mut Option<String>, name: &str| {
            if let Some(value) = lookup(name) {
                *field = Some(value);
            }
        };

        overlay(&mut self.auth_url, "OS_AUTH_URL");
        overlay(&mut self.token, "OS_TOKEN");
        overlay(&mut self.username, "OS_USERNAME");
        overlay(&mut self.password, "OS_PASSWORD");
        overlay(&mut self.project_name, "OS_PROJECT_NAME");
        overlay(&mut self.user_domain_name, "OS_USER_DOMAIN_NAME");
        overlay(&mut self.project_domain_name, "OS_PROJECT_DOMAIN_NAME");

        for service in Service::ALL {
            if let Some(url) = lookup(&service.env_var()) {
                self.endpoints.insert(service.key().to_string(), url);
            }
        }

        self
    }

    /// How to authenticate, from whichever credentials are present
    pub fn auth_method(&self) -> Result<AuthMethod> {
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(AuthMethod::Token(token.to_string()));
        }

        let missing = |name: &str| {
            Error::Config(format!(
                "{} is required for password authentication (or set OS_TOKEN)",
                name
            ))
        };

        Ok(AuthMethod::Password(PasswordAuth {
            auth_url: self.auth_url.clone().ok_or_else(|| missing("auth_url"))?,
            username: self.username.clone().ok_or_else(|| missing("username"))?,
            password: self.password.clone().ok_or_else(|| missing("password"))?,
            project_name: self.project_name.clone().ok_or_else(|| missing("project_name"))?,
            user_domain_name: self
                .user_domain_name
                .clone()
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            project_domain_name: self
                .project_domain_name
                .clone()
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
        }))
    }

    /// Endpoints keyed by service; unknown service keys are rejected
    pub fn service_endpoints(&self) -> Result<BTreeMap<Service, String>> {
        self.endpoints
            .iter()
            .map(|(key, url)| {
                Service::from_key(key)
                    .map(|service| (service, url.clone()))
                    .ok_or_else(|| Error::Config(format!("unknown service '{}' in endpoints", key)))
            })
            .collect()
    }

    /// Build a client from this configuration
    pub fn client(&self) -> Result<OpenStackClient> {
        OpenStackClient::new(self.auth_method()?, self.service_endpoints()?)
    }
}
