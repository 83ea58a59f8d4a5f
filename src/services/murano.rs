//! Murano (application catalog) bindings: environments.

use crate::error::Result;
use crate::openstack::client::{OpenStackClient, Service};
use crate::resource::{require, Envelope, PagedSequence, Payload, ResourceApi, ResourceDescriptor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lists are wrapped under `environments`; single environments are bare
pub static ENVIRONMENTS: ResourceDescriptor = ResourceDescriptor::new(
    Service::ApplicationCatalog,
    "v1/environments",
    "environments",
    "environment",
    &["id", "name", "status"],
)
.item_envelope(Envelope::Bare)
.request_envelope(Envelope::Bare);

crate::wire_enum! {
    pub enum EnvironmentStatus {
        Ready => "ready",
        Pending => "pending",
        Deploying => "deploying",
        DeployFailure => "deploy failure",
        Deleting => "deleting",
        DeleteFailure => "delete failure",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<EnvironmentStatus>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub networking: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateEnvironment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "defaultNetworks", skip_serializing_if = "Option::is_none")]
    pub default_networks: Option<Value>,
}

impl Payload for CreateEnvironment {
    fn validate(&self) -> Result<()> {
        require("name", self.name.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateEnvironment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Payload for UpdateEnvironment {}

/// Murano client
#[derive(Clone)]
pub struct MuranoApi {
    client: OpenStackClient,
}

impl MuranoApi {
    pub fn new(client: OpenStackClient) -> Self {
        Self { client }
    }

    pub fn environments(&self) -> ResourceApi<Environment> {
        ResourceApi::new(self.client.clone(), &ENVIRONMENTS)
    }

    pub fn list_environments(&self) -> PagedSequence<Environment> {
        self.environments().list()
    }
}
