//! Read-side network queries: list with filters, fetch by identifier.

use std::sync::Arc;

use corral_common::CorralResult;

use crate::directory::{NetworkDirectory, resolve_network};
use crate::filters::parse_filters;
use crate::resource::{NetworkResource, build_network_resource};

/// Read-only queries against the network directory.
pub struct NetworkQuery {
    networks: Arc<dyn NetworkDirectory>,
}

impl NetworkQuery {
    /// Create a query service over the given directory.
    #[must_use]
    pub fn new(networks: Arc<dyn NetworkDirectory>) -> Self {
        Self { networks }
    }

    /// List networks matching a raw filter specification.
    ///
    /// The `name` and `id` filters are resolved independently and their
    /// results concatenated: a network matching both filters appears twice.
    /// This additive behavior is long-established wire behavior and is kept
    /// as-is. Name resolution is best-effort; a name matching nothing
    /// contributes nothing. Without any filter, every known network is
    /// returned.
    ///
    /// # Errors
    ///
    /// Fails on a malformed filter specification or when a directory lookup
    /// itself fails.
    pub async fn list(&self, raw_filter: &str) -> CorralResult<Vec<NetworkResource>> {
        let filters = parse_filters(raw_filter)?;
        let names = filters.get("name");
        let ids = filters.get("id");

        let mut list = Vec::new();
        if let Some(names) = names {
            for name in names {
                if let Some(network) = self.networks.find_by_name(name).await? {
                    list.push(build_network_resource(Some(network.as_ref())));
                }
            }
        }

        if let Some(ids) = ids {
            for fragment in ids {
                for network in self.networks.find_by_id_or_prefix(fragment).await? {
                    list.push(build_network_resource(Some(network.as_ref())));
                }
            }
        }

        if names.is_none() && ids.is_none() {
            for network in self.networks.find_by_id_or_prefix("").await? {
                list.push(build_network_resource(Some(network.as_ref())));
            }
        }

        tracing::debug!(count = list.len(), "Listed networks");
        Ok(list)
    }

    /// Fetch a single network by name, ID, or ID prefix.
    ///
    /// # Errors
    ///
    /// Returns [`corral_common::CorralError::NetworkNotFound`] when the
    /// identifier matches nothing.
    pub async fn get(&self, identifier: &str) -> CorralResult<NetworkResource> {
        let network = resolve_network(self.networks.as_ref(), identifier).await?;
        Ok(build_network_resource(Some(network.as_ref())))
    }
}
