//! OpenStack Client
//!
//! Main client for interacting with OpenStack APIs, combining authentication,
//! the HTTP client and the configured service endpoints.

use super::auth::{AuthMethod, Credentials};
use super::http::{ApiResponse, OpenStackHttpClient};
use crate::error::{Error, Result};
use reqwest::Method;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// OpenStack services this crate has bindings for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Service {
    /// Ceilometer telemetry
    Metering,
    /// Heat
    Orchestration,
    /// Murano
    ApplicationCatalog,
    /// Neutron
    Network,
    /// Nova
    Compute,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Service::Metering,
        Service::Orchestration,
        Service::ApplicationCatalog,
        Service::Network,
        Service::Compute,
    ];

    /// Service type as used in the Keystone catalog and in config files
    pub fn key(&self) -> &'static str {
        match self {
            Service::Metering => "metering",
            Service::Orchestration => "orchestration",
            Service::ApplicationCatalog => "application-catalog",
            Service::Network => "network",
            Service::Compute => "compute",
        }
    }

    /// Environment variable carrying this service's endpoint
    pub fn env_var(&self) -> String {
        format!("OS_{}_ENDPOINT", self.key().replace('-', "_").to_uppercase())
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Main OpenStack client
#[derive(Clone)]
pub struct OpenStackClient {
    pub credentials: Credentials,
    pub http: OpenStackHttpClient,
    endpoints: BTreeMap<Service, String>,
}

impl OpenStackClient {
    /// Create a new client from an auth method and per-service endpoints
    pub fn new(auth: AuthMethod, endpoints: BTreeMap<Service, String>) -> Result<Self> {
        let http = OpenStackHttpClient::new()?;
        let credentials = Credentials::new(auth, http.inner().clone());

        Ok(Self {
            credentials,
            http,
            endpoints,
        })
    }

    /// Convenience constructor for a pre-issued token
    pub fn with_token(token: &str, endpoints: BTreeMap<Service, String>) -> Result<Self> {
        Self::new(AuthMethod::Token(token.to_string()), endpoints)
    }

    /// Add or replace one service endpoint
    pub fn with_endpoint(mut self, service: Service, url: &str) -> Self {
        self.endpoints.insert(service, url.to_string());
        self
    }

    /// Get the current token
    pub async fn get_token(&self) -> Result<String> {
        self.credentials.get_token().await
    }

    /// Base URL configured for a service
    pub fn endpoint(&self, service: Service) -> Result<&str> {
        self.endpoints
            .get(&service)
            .map(|s| s.trim_end_matches('/'))
            .ok_or_else(|| {
                Error::Config(format!(
                    "no endpoint configured for the {} service (set {})",
                    service,
                    service.env_var()
                ))
            })
    }

    /// Build a full URL for a path under a service endpoint
    pub fn service_url(&self, service: Service, path: &str) -> Result<String> {
        Ok(format!(
            "{}/{}",
            self.endpoint(service)?,
            path.trim_start_matches('/')
        ))
    }

    /// Issue one authenticated request against a service
    pub async fn request(
        &self,
        method: Method,
        service: Service,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let url = self.service_url(service, path)?;
        let token = self.get_token().await?;
        self.http.execute(method, &url, query, &token, body).await
    }
}
