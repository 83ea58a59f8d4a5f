//! Nova extension bindings: server groups (`os-server-groups`).

use crate::error::{Error, Result};
use crate::openstack::client::{OpenStackClient, Service};
use crate::resource::{require, PagedSequence, Payload, ResourceApi, ResourceDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub static SERVER_GROUPS: ResourceDescriptor = ResourceDescriptor::new(
    Service::Compute,
    "os-server-groups",
    "server_groups",
    "server_group",
    &["id", "name"],
);

crate::wire_enum! {
    pub enum ServerGroupPolicy {
        Affinity => "affinity",
        AntiAffinity => "anti-affinity",
        SoftAffinity => "soft-affinity",
        SoftAntiAffinity => "soft-anti-affinity",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub policies: Vec<ServerGroupPolicy>,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateServerGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub policies: Vec<ServerGroupPolicy>,
}

impl Payload for CreateServerGroup {
    fn validate(&self) -> Result<()> {
        require("name", self.name.as_deref())?;
        if self.policies.is_empty() {
            return Err(Error::Validation("at least one policy is required".to_string()));
        }
        Ok(())
    }
}

/// Nova extensions client
#[derive(Clone)]
pub struct NovaApi {
    client: OpenStackClient,
}

impl NovaApi {
    pub fn new(client: OpenStackClient) -> Self {
        Self { client }
    }

    pub fn server_groups(&self) -> ResourceApi<ServerGroup> {
        ResourceApi::new(self.client.clone(), &SERVER_GROUPS)
    }

    pub fn list_server_groups(&self) -> PagedSequence<ServerGroup> {
        self.server_groups().list()
    }
}
