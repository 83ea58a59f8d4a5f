//! Neutron (networking) bindings: floating IPs, security groups and
//! security group rules.
//!
//! Neutron wraps every body under the resource key and pages with
//! `<collection>_links` / `marker`.

use crate::error::{Error, Result};
use crate::openstack::client::{OpenStackClient, Service};
use crate::resource::{require, PagedSequence, Payload, QueryOptions, ResourceApi, ResourceDescriptor};
use serde::{Deserialize, Serialize};

pub static FLOATING_IPS: ResourceDescriptor = ResourceDescriptor::new(
    Service::Network,
    "v2.0/floatingips",
    "floatingips",
    "floatingip",
    &["id", "floating_ip_address", "status"],
)
.name_field("floating_ip_address");

pub static SECURITY_GROUPS: ResourceDescriptor = ResourceDescriptor::new(
    Service::Network,
    "v2.0/security-groups",
    "security_groups",
    "security_group",
    &["id", "name"],
);

pub static SECURITY_GROUP_RULES: ResourceDescriptor = ResourceDescriptor::new(
    Service::Network,
    "v2.0/security-group-rules",
    "security_group_rules",
    "security_group_rule",
    &["id", "security_group_id", "direction"],
);

crate::wire_enum! {
    pub enum FloatingIpStatus {
        Active => "ACTIVE",
        Down => "DOWN",
        Error => "ERROR",
    }
}

crate::wire_enum! {
    pub enum RuleDirection {
        Ingress => "ingress",
        Egress => "egress",
    }
}

crate::wire_enum! {
    pub enum EtherType {
        Ipv4 => "IPv4",
        Ipv6 => "IPv6",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingIp {
    pub id: String,
    #[serde(default)]
    pub floating_ip_address: Option<String>,
    #[serde(default)]
    pub floating_network_id: Option<String>,
    #[serde(default)]
    pub fixed_ip_address: Option<String>,
    #[serde(default)]
    pub port_id: Option<String>,
    #[serde(default)]
    pub router_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub status: Option<FloatingIpStatus>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateFloatingIp {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating_network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateFloatingIp {
    pub fn on_network(floating_network_id: &str) -> Self {
        Self {
            floating_network_id: Some(floating_network_id.to_string()),
            ..Default::default()
        }
    }
}

impl Payload for CreateFloatingIp {
    fn validate(&self) -> Result<()> {
        require("floating_network_id", self.floating_network_id.as_deref())
    }
}

/// Body of `PUT /v2.0/floatingips/{id}`.
///
/// `port_id: Some(None)` sends an explicit `null`, which disassociates the
/// address; `None` leaves the association alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateFloatingIp {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateFloatingIp {
    pub fn associate(port_id: &str) -> Self {
        Self {
            port_id: Some(Some(port_id.to_string())),
            ..Default::default()
        }
    }

    pub fn disassociate() -> Self {
        Self {
            port_id: Some(None),
            ..Default::default()
        }
    }
}

impl Payload for UpdateFloatingIp {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityGroupRule {
    pub id: String,
    pub security_group_id: String,
    pub direction: RuleDirection,
    #[serde(default)]
    pub ethertype: Option<EtherType>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub port_range_min: Option<u16>,
    #[serde(default)]
    pub port_range_max: Option<u16>,
    #[serde(default)]
    pub remote_ip_prefix: Option<String>,
    #[serde(default)]
    pub remote_group_id: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub security_group_rules: Vec<SecurityGroupRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateSecurityGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl Payload for CreateSecurityGroup {
    fn validate(&self) -> Result<()> {
        require("name", self.name.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateSecurityGroup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Payload for UpdateSecurityGroup {}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateSecurityGroupRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<RuleDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ethertype: Option<EtherType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_range_min: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_range_max: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_ip_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_group_id: Option<String>,
}

impl Payload for CreateSecurityGroupRule {
    fn validate(&self) -> Result<()> {
        require("security_group_id", self.security_group_id.as_deref())?;
        if self.direction.is_none() {
            return Err(Error::Validation("direction is required".to_string()));
        }
        if let (Some(min), Some(max)) = (self.port_range_min, self.port_range_max) {
            if min > max {
                return Err(Error::Validation(format!(
                    "port_range_min {} exceeds port_range_max {}",
                    min, max
                )));
            }
        }
        if self.remote_ip_prefix.is_some() && self.remote_group_id.is_some() {
            return Err(Error::Validation(
                "remote_ip_prefix and remote_group_id are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Neutron client
#[derive(Clone)]
pub struct NeutronApi {
    client: OpenStackClient,
}

impl NeutronApi {
    pub fn new(client: OpenStackClient) -> Self {
        Self { client }
    }

    pub fn floating_ips(&self) -> ResourceApi<FloatingIp> {
        ResourceApi::new(self.client.clone(), &FLOATING_IPS)
    }

    pub fn security_groups(&self) -> ResourceApi<SecurityGroup> {
        ResourceApi::new(self.client.clone(), &SECURITY_GROUPS)
    }

    pub fn security_group_rules(&self) -> ResourceApi<SecurityGroupRule> {
        ResourceApi::new(self.client.clone(), &SECURITY_GROUP_RULES)
    }

    pub fn list_floating_ips(&self, options: QueryOptions) -> PagedSequence<FloatingIp> {
        self.floating_ips().list_with(options)
    }

    /// Rules belonging to one security group
    pub fn list_rules_of(&self, security_group_id: &str) -> PagedSequence<SecurityGroupRule> {
        self.security_group_rules()
            .list_with(QueryOptions::new().filter("security_group_id", security_group_id))
    }
}
