//! OpenStack API interaction module
//!
//! This module provides the collaborators every resource binding relies on:
//! authentication, the HTTP client and the service endpoint map.
//!
//! # Module Structure
//!
//! - [`auth`] - Pre-issued tokens and Keystone v3 password authentication
//! - [`client`] - Main OpenStack client for making API requests
//! - [`http`] - HTTP utilities and status classification
//!
//! # Example
//!
//! ```ignore
//! use osapi::openstack::client::{OpenStackClient, Service};
//!
//! async fn example() -> osapi::Result<()> {
//!     let client = OpenStackClient::with_token("gAAAA...", Default::default())?
//!         .with_endpoint(Service::Network, "https://neutron.example.com:9696");
//!     let response = client
//!         .request(reqwest::Method::GET, Service::Network, "v2.0/floatingips", &[], None)
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
