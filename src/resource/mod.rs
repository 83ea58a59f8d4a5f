//! Resource abstraction layer
//!
//! This module provides the one generic listing/CRUD pattern every OpenStack
//! binding in [`crate::services`] instantiates. Resources are described by
//! static [`ResourceDescriptor`] values interpreted by a single generic
//! client, [`ResourceApi`], instead of one hand-written client per resource.
//!
//! # Architecture
//!
//! - [`descriptor`] - Paths, envelope keys and query style of a resource
//! - [`query`] - Filters, projection and pagination parameters
//! - [`pagination`] - Marker extraction and lazy page chaining
//! - [`fallback`] - Benign defaults for 404 on reads and deletes
//! - [`api`] - The typed facade composing all of the above
//! - [`registry`] - Lookup of descriptors by key (used by the CLI)
//! - [`wire_enum`] - Enums that tolerate values newer than this client
//!
//! # Example
//!
//! ```ignore
//! use futures::TryStreamExt;
//! use osapi::resource::QueryOptions;
//! use osapi::services::neutron::NeutronApi;
//!
//! async fn down_ips(neutron: &NeutronApi) -> osapi::Result<Vec<String>> {
//!     neutron
//!         .floating_ips()
//!         .list_with(QueryOptions::new().filter("status", "DOWN"))
//!         .map_ok(|ip| ip.id)
//!         .try_collect()
//!         .await
//! }
//! ```

pub mod api;
pub mod descriptor;
pub mod fallback;
pub mod pagination;
pub mod query;
pub mod registry;
pub mod wire_enum;

pub use api::{require, Payload, Reference, ResourceApi};
pub use descriptor::{Envelope, QueryStyle, ResourceDescriptor, UpdateMethod};
pub use fallback::{FallbackRule, Operation};
pub use pagination::{paged, Page, PagedSequence};
pub use query::{parse_filter, Filter, Operator, QueryOptions};
pub use registry::{get_all_resource_keys, get_resource, ResourceEntry};
