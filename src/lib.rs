//! Typed bindings for paginated OpenStack resources.
//!
//! Every resource (Ceilometer alarms, Heat stacks, Neutron floating IPs, ...)
//! is described by a static [`resource::ResourceDescriptor`] and served by the
//! generic [`resource::ResourceApi`], which handles query encoding, marker
//! pagination and the not-found fallbacks in one place.

pub mod config;
pub mod error;
pub mod openstack;
pub mod resource;
pub mod services;

pub use config::Config;
pub use error::{format_api_error, Error, Result};
pub use openstack::client::{OpenStackClient, Service};
