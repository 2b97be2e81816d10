//! # corral-network
//!
//! Network management core for Corral containers.
//!
//! This crate sits between the request boundary and the network engine:
//! it resolves networks and containers by name or ID, enforces the opt-in
//! duplicate-name policy, and renders wire-stable resource views. All
//! authoritative state lives behind the [`NetworkDirectory`] and
//! [`ContainerDirectory`] contracts; the core itself is stateless.

#![warn(missing_docs)]

pub mod attach;
pub mod directory;
pub mod filters;
pub mod lifecycle;
pub mod memory;
pub mod query;
pub mod resource;
pub mod types;

pub use attach::EndpointAttachment;
pub use directory::{
    Container, ContainerDirectory, Endpoint, Network, NetworkDirectory, resolve_network,
};
pub use filters::{Filters, parse_filters};
pub use lifecycle::{NetworkCreated, NetworkLifecycle};
pub use memory::{MemoryContainerDirectory, MemoryNetworkDirectory};
pub use query::NetworkQuery;
pub use resource::{
    EndpointResource, NetworkResource, build_endpoint_resource, build_network_resource,
};
pub use types::{EndpointInfo, Interface, IpNet, MacAddress, SandboxInfo};
