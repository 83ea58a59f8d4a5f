//! Per-service bindings
//!
//! Each module declares the descriptors, domain types and request payloads
//! for one OpenStack service and a small client exposing a typed
//! [`ResourceApi`](crate::resource::ResourceApi) per resource.
//!
//! - [`ceilometer`] - Alarms and meters
//! - [`heat`] - Stacks
//! - [`murano`] - Environments
//! - [`neutron`] - Floating IPs, security groups and rules
//! - [`nova`] - Server groups

pub mod ceilometer;
pub mod heat;
pub mod murano;
pub mod neutron;
pub mod nova;

pub use ceilometer::CeilometerApi;
pub use heat::HeatApi;
pub use murano::MuranoApi;
pub use neutron::NeutronApi;
pub use nova::NovaApi;
