//! Resource Registry
//!
//! Maps short keys (as typed on the command line) to resource descriptors.

use super::descriptor::ResourceDescriptor;
use crate::services::{ceilometer, heat, murano, neutron, nova};

/// A named, listable resource
#[derive(Debug)]
pub struct ResourceEntry {
    pub key: &'static str,
    pub display_name: &'static str,
    pub descriptor: &'static ResourceDescriptor,
}

static RESOURCES: &[ResourceEntry] = &[
    ResourceEntry {
        key: "alarms",
        display_name: "Ceilometer Alarms",
        descriptor: &ceilometer::ALARMS,
    },
    ResourceEntry {
        key: "meters",
        display_name: "Ceilometer Meters",
        descriptor: &ceilometer::METERS,
    },
    ResourceEntry {
        key: "stacks",
        display_name: "Heat Stacks",
        descriptor: &heat::STACKS,
    },
    ResourceEntry {
        key: "environments",
        display_name: "Murano Environments",
        descriptor: &murano::ENVIRONMENTS,
    },
    ResourceEntry {
        key: "floating-ips",
        display_name: "Neutron Floating IPs",
        descriptor: &neutron::FLOATING_IPS,
    },
    ResourceEntry {
        key: "security-groups",
        display_name: "Neutron Security Groups",
        descriptor: &neutron::SECURITY_GROUPS,
    },
    ResourceEntry {
        key: "security-group-rules",
        display_name: "Neutron Security Group Rules",
        descriptor: &neutron::SECURITY_GROUP_RULES,
    },
    ResourceEntry {
        key: "server-groups",
        display_name: "Nova Server Groups",
        descriptor: &nova::SERVER_GROUPS,
    },
];

/// Get a resource entry by key
pub fn get_resource(key: &str) -> Option<&'static ResourceEntry> {
    RESOURCES.iter().find(|entry| entry.key == key)
}

/// Get all resource keys (for help output)
pub fn get_all_resource_keys() -> Vec<&'static str> {
    RESOURCES.iter().map(|entry| entry.key).collect()
}
