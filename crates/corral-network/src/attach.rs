//! Connecting and disconnecting containers to and from networks.

use std::sync::Arc;

use corral_common::{CorralError, CorralResult};

use crate::directory::{ContainerDirectory, NetworkDirectory, resolve_network};

/// Attaches containers to networks through the container runtime.
pub struct EndpointAttachment {
    networks: Arc<dyn NetworkDirectory>,
    containers: Arc<dyn ContainerDirectory>,
}

impl EndpointAttachment {
    /// Create an attachment service over the given directories.
    #[must_use]
    pub fn new(
        networks: Arc<dyn NetworkDirectory>,
        containers: Arc<dyn ContainerDirectory>,
    ) -> Self {
        Self {
            networks,
            containers,
        }
    }

    /// Connect a container to a network.
    ///
    /// The container's attach operation is invoked with the network's name;
    /// attach failures propagate unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::NetworkNotFound`] for an unresolvable network
    /// and [`CorralError::InvalidContainer`] for an unresolvable container.
    pub async fn connect(
        &self,
        network_identifier: &str,
        container_identifier: &str,
    ) -> CorralResult<()> {
        let network = resolve_network(self.networks.as_ref(), network_identifier).await?;
        let container = self.resolve_container(container_identifier).await?;
        tracing::debug!(
            network = network.name(),
            container = container.id(),
            "Connecting container"
        );
        container.connect_to_network(network.name()).await
    }

    /// Disconnect a container from a network.
    ///
    /// Symmetric to [`Self::connect`], except the detach operation receives
    /// the resolved network object itself rather than its name.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::NetworkNotFound`] for an unresolvable network
    /// and [`CorralError::InvalidContainer`] for an unresolvable container.
    pub async fn disconnect(
        &self,
        network_identifier: &str,
        container_identifier: &str,
    ) -> CorralResult<()> {
        let network = resolve_network(self.networks.as_ref(), network_identifier).await?;
        let container = self.resolve_container(container_identifier).await?;
        tracing::debug!(
            network = network.name(),
            container = container.id(),
            "Disconnecting container"
        );
        container.disconnect_from_network(network).await
    }

    async fn resolve_container(
        &self,
        identifier: &str,
    ) -> CorralResult<Arc<dyn crate::directory::Container>> {
        self.containers
            .find(identifier)
            .await
            .map_err(|source| CorralError::InvalidContainer {
                id: identifier.to_string(),
                source: Box::new(source),
            })
    }
}
