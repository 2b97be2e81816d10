//! In-memory reference engine.
//!
//! Implements both directory contracts over `RwLock`-guarded state so the
//! daemon runs end-to-end without a kernel-backed engine and the services
//! are testable deterministically. Interface addresses come from a toy
//! sequential allocator; real address management belongs to a real engine.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use corral_common::{CorralError, CorralResult, ObjectId};
use parking_lot::RwLock;

use crate::directory::{Container, ContainerDirectory, Endpoint, Network, NetworkDirectory};
use crate::types::{EndpointInfo, Interface, IpNet, MacAddress, SandboxInfo};

/// Driver recorded when a create request names none.
const DEFAULT_DRIVER: &str = "bridge";

struct EngineState {
    /// Networks in insertion order. Names are not unique; IDs are.
    networks: Vec<Arc<MemoryNetwork>>,
    /// Next host number for the toy address allocator.
    next_host: u32,
}

struct MemoryNetwork {
    id: ObjectId,
    name: String,
    driver: String,
    options: HashMap<String, String>,
    endpoints: RwLock<Vec<Arc<MemoryEndpoint>>>,
    engine: Weak<RwLock<EngineState>>,
}

// Lock order is engine state before endpoint lists, everywhere.
#[async_trait]
impl Network for MemoryNetwork {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn driver(&self) -> &str {
        &self.driver
    }

    fn options(&self) -> HashMap<String, String> {
        self.options.clone()
    }

    fn endpoints(&self) -> Vec<Arc<dyn Endpoint>> {
        self.endpoints
            .read()
            .iter()
            .map(|e| Arc::clone(e) as Arc<dyn Endpoint>)
            .collect()
    }

    async fn delete(&self) -> CorralResult<()> {
        let engine = self
            .engine
            .upgrade()
            .ok_or_else(|| CorralError::NetworkNotFound {
                id: self.id.to_string(),
            })?;
        let mut state = engine.write();

        if !self.endpoints.read().is_empty() {
            return Err(CorralError::Directory {
                message: format!("network {} has active endpoints", self.name),
            });
        }

        let position = state
            .networks
            .iter()
            .position(|n| n.id == self.id)
            .ok_or_else(|| CorralError::NetworkNotFound {
                id: self.id.to_string(),
            })?;
        state.networks.remove(position);
        tracing::debug!(id = %self.id, name = %self.name, "Network removed from engine");
        Ok(())
    }
}

struct MemoryEndpoint {
    id: ObjectId,
    info: EndpointInfo,
}

impl Endpoint for MemoryEndpoint {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn info(&self) -> EndpointInfo {
        self.info.clone()
    }
}

/// In-memory implementation of [`NetworkDirectory`].
pub struct MemoryNetworkDirectory {
    state: Arc<RwLock<EngineState>>,
}

impl MemoryNetworkDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(EngineState {
                networks: Vec::new(),
                next_host: 2,
            })),
        }
    }
}

impl Default for MemoryNetworkDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkDirectory for MemoryNetworkDirectory {
    async fn find_by_name(&self, name: &str) -> CorralResult<Option<Arc<dyn Network>>> {
        let state = self.state.read();
        Ok(state
            .networks
            .iter()
            .find(|n| n.name == name)
            .map(|n| Arc::clone(n) as Arc<dyn Network>))
    }

    async fn find_by_id_or_prefix(&self, fragment: &str) -> CorralResult<Vec<Arc<dyn Network>>> {
        let state = self.state.read();
        Ok(state
            .networks
            .iter()
            .filter(|n| n.id.as_str().starts_with(fragment))
            .map(|n| Arc::clone(n) as Arc<dyn Network>)
            .collect())
    }

    async fn create(
        &self,
        name: &str,
        driver: &str,
        options: HashMap<String, String>,
    ) -> CorralResult<Arc<dyn Network>> {
        let driver = if driver.is_empty() {
            DEFAULT_DRIVER
        } else {
            driver
        };
        let network = Arc::new(MemoryNetwork {
            id: ObjectId::generate(),
            name: name.to_string(),
            driver: driver.to_string(),
            options,
            endpoints: RwLock::new(Vec::new()),
            engine: Arc::downgrade(&self.state),
        });

        self.state.write().networks.push(Arc::clone(&network));
        tracing::debug!(id = %network.id, name, driver, "Network recorded in engine");
        Ok(network)
    }
}

struct MemoryContainer {
    id: ObjectId,
    name: String,
    state: Arc<RwLock<EngineState>>,
}

#[async_trait]
impl Container for MemoryContainer {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    async fn connect_to_network(&self, network_name: &str) -> CorralResult<()> {
        let mut state = self.state.write();
        let network = state
            .networks
            .iter()
            .find(|n| n.name == network_name)
            .cloned()
            .ok_or_else(|| CorralError::NetworkNotFound {
                id: network_name.to_string(),
            })?;

        let already_connected = network.endpoints.read().iter().any(|e| {
            e.info
                .sandbox
                .as_ref()
                .is_some_and(|s| s.container_id == self.id.as_str())
        });
        if already_connected {
            return Err(CorralError::Directory {
                message: format!(
                    "container {} is already connected to network {}",
                    self.name, network_name
                ),
            });
        }

        let host = state.next_host;
        state.next_host += 1;
        let endpoint = Arc::new(MemoryEndpoint {
            id: ObjectId::generate(),
            info: EndpointInfo {
                sandbox: Some(SandboxInfo {
                    container_id: self.id.to_string(),
                }),
                iface: Some(allocate_interface(host)),
            },
        });
        network.endpoints.write().push(endpoint);
        Ok(())
    }

    async fn disconnect_from_network(&self, network: Arc<dyn Network>) -> CorralResult<()> {
        let target = {
            let state = self.state.read();
            state
                .networks
                .iter()
                .find(|n| n.id.as_str() == network.id())
                .cloned()
        };
        let target = target.ok_or_else(|| CorralError::NetworkNotFound {
            id: network.id().to_string(),
        })?;

        let mut endpoints = target.endpoints.write();
        let before = endpoints.len();
        endpoints.retain(|e| {
            e.info
                .sandbox
                .as_ref()
                .is_none_or(|s| s.container_id != self.id.as_str())
        });
        if endpoints.len() == before {
            return Err(CorralError::Directory {
                message: format!(
                    "container {} is not connected to network {}",
                    self.name,
                    target.name
                ),
            });
        }
        Ok(())
    }
}

/// Toy sequential interface allocation for the reference engine.
fn allocate_interface(host: u32) -> Interface {
    let high = u8::try_from((host >> 8) & 0xff).unwrap_or(0);
    let low = u8::try_from(host & 0xff).unwrap_or(0);
    Interface {
        mac: Some(MacAddress::new([0x02, 0x42, 172, 18, high, low])),
        ipv4: Some(IpNet::new(IpAddr::V4(Ipv4Addr::new(172, 18, high, low)), 16)),
        ipv6: Some(IpNet::new(
            IpAddr::V6(Ipv6Addr::new(
                0xfd00,
                0,
                0,
                0,
                0,
                0,
                u16::try_from(host >> 16).unwrap_or(0),
                u16::try_from(host & 0xffff).unwrap_or(0),
            )),
            64,
        )),
    }
}

/// In-memory implementation of [`ContainerDirectory`].
pub struct MemoryContainerDirectory {
    state: Arc<RwLock<EngineState>>,
    containers: RwLock<Vec<Arc<MemoryContainer>>>,
}

impl MemoryContainerDirectory {
    /// Create a container directory sharing the given network engine.
    #[must_use]
    pub fn new(networks: &MemoryNetworkDirectory) -> Self {
        Self {
            state: Arc::clone(&networks.state),
            containers: RwLock::new(Vec::new()),
        }
    }

    /// Snapshot of registered containers as `(id, name)` pairs.
    #[must_use]
    pub fn containers(&self) -> Vec<(String, String)> {
        self.containers
            .read()
            .iter()
            .map(|c| (c.id.to_string(), c.name.clone()))
            .collect()
    }

    /// Register a container, returning its handle.
    ///
    /// Stands in for the container runtime's own lifecycle; the network
    /// layer only ever resolves containers, it never creates them.
    pub fn add_container(&self, name: &str) -> Arc<dyn Container> {
        let container = Arc::new(MemoryContainer {
            id: ObjectId::generate(),
            name: name.to_string(),
            state: Arc::clone(&self.state),
        });
        self.containers.write().push(Arc::clone(&container));
        container
    }
}

#[async_trait]
impl ContainerDirectory for MemoryContainerDirectory {
    async fn find(&self, identifier: &str) -> CorralResult<Arc<dyn Container>> {
        let containers = self.containers.read();
        containers
            .iter()
            .find(|c| c.id.as_str() == identifier || c.name == identifier)
            .map(|c| Arc::clone(c) as Arc<dyn Container>)
            .ok_or_else(|| CorralError::Directory {
                message: format!("No such container: {identifier}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_unique_ids_and_allows_duplicate_names() {
        let directory = MemoryNetworkDirectory::new();
        let first = directory
            .create("web", "bridge", HashMap::new())
            .await
            .unwrap();
        let second = directory
            .create("web", "bridge", HashMap::new())
            .await
            .unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(first.name(), second.name());
    }

    #[tokio::test]
    async fn empty_driver_falls_back_to_default() {
        let directory = MemoryNetworkDirectory::new();
        let network = directory.create("web", "", HashMap::new()).await.unwrap();
        assert_eq!(network.driver(), DEFAULT_DRIVER);
    }

    #[tokio::test]
    async fn prefix_lookup_matches_multiple() {
        let directory = MemoryNetworkDirectory::new();
        directory
            .create("one", "bridge", HashMap::new())
            .await
            .unwrap();
        directory
            .create("two", "bridge", HashMap::new())
            .await
            .unwrap();

        // Generated IDs are hex, so the empty prefix is the only one
        // guaranteed to match both.
        let all = directory.find_by_id_or_prefix("").await.unwrap();
        assert_eq!(all.len(), 2);

        let one = directory.find_by_name("one").await.unwrap().unwrap();
        let by_prefix = directory
            .find_by_id_or_prefix(&one.id()[..6])
            .await
            .unwrap();
        assert!(by_prefix.iter().any(|n| n.id() == one.id()));
    }

    #[tokio::test]
    async fn options_are_recorded() {
        let directory = MemoryNetworkDirectory::new();
        let mut options = HashMap::new();
        options.insert("mtu".to_string(), "1450".to_string());
        let network = directory
            .create("web", "bridge", options.clone())
            .await
            .unwrap();
        assert_eq!(network.options(), options);
    }

    #[tokio::test]
    async fn unknown_container_lookup_fails() {
        let networks = MemoryNetworkDirectory::new();
        let containers = MemoryContainerDirectory::new(&networks);
        let err = containers.find("ghost").await.err().unwrap();
        assert!(err.to_string().contains("ghost"));
    }

    #[tokio::test]
    async fn delete_rejects_attached_endpoints_and_keeps_network() {
        let networks = MemoryNetworkDirectory::new();
        let containers = MemoryContainerDirectory::new(&networks);
        let network = networks
            .create("web", "bridge", HashMap::new())
            .await
            .unwrap();
        let container = containers.add_container("c1");
        container.connect_to_network("web").await.unwrap();

        let err = network.delete().await.unwrap_err();
        assert!(matches!(err, CorralError::Directory { .. }));
        assert!(networks.find_by_name("web").await.unwrap().is_some());

        container
            .disconnect_from_network(Arc::clone(&network))
            .await
            .unwrap();
        network.delete().await.unwrap();
        assert!(networks.find_by_name("web").await.unwrap().is_none());
    }
}
