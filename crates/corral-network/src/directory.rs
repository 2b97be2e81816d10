//! Directory contracts over external network and container state.
//!
//! The core never owns networks, endpoints, or containers; it queries them
//! through these two narrow traits. Real engines (netlink, RPC) implement
//! them once; tests and the bundled daemon use the in-memory engine in
//! [`crate::memory`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use corral_common::{CorralError, CorralResult};

use crate::types::EndpointInfo;

/// A logical network containers can join.
///
/// Identity is the engine-assigned ID; the name is just an attribute and is
/// not unique across networks.
#[async_trait]
pub trait Network: Send + Sync {
    /// Engine-assigned, globally unique ID.
    fn id(&self) -> &str;

    /// User-chosen name (not unique).
    fn name(&self) -> &str;

    /// Tag naming the backing driver implementation.
    fn driver(&self) -> &str;

    /// Driver-specific options the network was created with.
    fn options(&self) -> HashMap<String, String>;

    /// Current endpoints of this network.
    fn endpoints(&self) -> Vec<Arc<dyn Endpoint>>;

    /// Request deletion from the owning engine.
    ///
    /// # Errors
    ///
    /// Propagates the engine's rejection unmodified, e.g. when endpoints
    /// are still attached.
    async fn delete(&self) -> CorralResult<()>;
}

/// A container's attachment point within one network.
pub trait Endpoint: Send + Sync {
    /// Endpoint ID, unique within its network.
    fn id(&self) -> &str;

    /// Snapshot of the endpoint's sandbox and interface state.
    fn info(&self) -> EndpointInfo;
}

/// A running container as seen by the network layer.
#[async_trait]
pub trait Container: Send + Sync {
    /// Container ID.
    fn id(&self) -> &str;

    /// Attach this container to the network with the given name.
    ///
    /// # Errors
    ///
    /// Propagates the runtime's failure unmodified.
    async fn connect_to_network(&self, network_name: &str) -> CorralResult<()>;

    /// Detach this container from the given network.
    ///
    /// # Errors
    ///
    /// Propagates the runtime's failure unmodified.
    async fn disconnect_from_network(&self, network: Arc<dyn Network>) -> CorralResult<()>;
}

/// Authoritative directory of networks, owned by the network engine.
#[async_trait]
pub trait NetworkDirectory: Send + Sync {
    /// Look up a network by exact name.
    ///
    /// Absence is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Fails only when the lookup itself fails inside the engine.
    async fn find_by_name(&self, name: &str) -> CorralResult<Option<Arc<dyn Network>>>;

    /// Look up networks by ID or ID prefix.
    ///
    /// May match several networks per fragment; the empty fragment matches
    /// every known network.
    ///
    /// # Errors
    ///
    /// Fails only when the lookup itself fails inside the engine.
    async fn find_by_id_or_prefix(&self, fragment: &str) -> CorralResult<Vec<Arc<dyn Network>>>;

    /// Create a new network.
    ///
    /// The engine assigns the ID and must not enforce name uniqueness.
    ///
    /// # Errors
    ///
    /// Propagates the engine's failure unmodified.
    async fn create(
        &self,
        name: &str,
        driver: &str,
        options: HashMap<String, String>,
    ) -> CorralResult<Arc<dyn Network>>;
}

/// Authoritative directory of containers, owned by the container runtime.
#[async_trait]
pub trait ContainerDirectory: Send + Sync {
    /// Resolve a container by name or ID.
    ///
    /// # Errors
    ///
    /// Fails when the identifier matches no container.
    async fn find(&self, identifier: &str) -> CorralResult<Arc<dyn Container>>;
}

/// Resolve a single network by name, ID, or ID prefix.
///
/// An exact name match wins; otherwise the ID/prefix lookup is consulted,
/// preferring an exact ID match over prefix matches.
///
/// # Errors
///
/// Returns [`CorralError::NetworkNotFound`] when nothing matches.
pub async fn resolve_network(
    directory: &dyn NetworkDirectory,
    identifier: &str,
) -> CorralResult<Arc<dyn Network>> {
    if let Some(network) = directory.find_by_name(identifier).await? {
        return Ok(network);
    }

    let matches = directory.find_by_id_or_prefix(identifier).await?;
    if let Some(exact) = matches.iter().find(|n| n.id() == identifier) {
        return Ok(Arc::clone(exact));
    }

    matches
        .into_iter()
        .next()
        .ok_or_else(|| CorralError::NetworkNotFound {
            id: identifier.to_string(),
        })
}
