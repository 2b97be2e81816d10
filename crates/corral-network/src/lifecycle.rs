//! Network creation and deletion.

use std::collections::HashMap;
use std::sync::Arc;

use corral_common::{CorralError, CorralResult};

use crate::directory::{NetworkDirectory, resolve_network};

/// Outcome of a successful network creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkCreated {
    /// Engine-assigned ID of the new network.
    pub id: String,
    /// Informational duplicate-name warning, empty when none applies.
    pub warning: String,
}

/// Creates and deletes networks, enforcing the duplicate-name policy.
pub struct NetworkLifecycle {
    networks: Arc<dyn NetworkDirectory>,
}

impl NetworkLifecycle {
    /// Create a lifecycle service over the given directory.
    #[must_use]
    pub fn new(networks: Arc<dyn NetworkDirectory>) -> Self {
        Self { networks }
    }

    /// Create a network.
    ///
    /// Network names are not unique; uniqueness is opt-in per request via
    /// `check_duplicate`. When a same-named network already exists and
    /// `check_duplicate` is false, creation proceeds anyway and the returned
    /// warning names the pre-existing network.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::NetworkNameConflict`] when `check_duplicate`
    /// is set and the name is taken; engine failures propagate unmodified.
    pub async fn create(
        &self,
        name: &str,
        driver: &str,
        options: HashMap<String, String>,
        check_duplicate: bool,
    ) -> CorralResult<NetworkCreated> {
        let mut warning = String::new();
        if let Some(existing) = self.networks.find_by_name(name).await? {
            if check_duplicate {
                return Err(CorralError::NetworkNameConflict {
                    name: name.to_string(),
                });
            }
            warning = format!(
                "Network with name {} (id : {}) already exists",
                existing.name(),
                existing.id()
            );
        }

        let network = self.networks.create(name, driver, options).await?;
        tracing::info!(name, driver, id = network.id(), "Network created");
        Ok(NetworkCreated {
            id: network.id().to_string(),
            warning,
        })
    }

    /// Delete a network by name, ID, or ID prefix.
    ///
    /// No preconditions are checked here; an engine rejection (e.g. the
    /// network still has active endpoints) propagates unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::NetworkNotFound`] when the identifier matches
    /// nothing; engine failures propagate unmodified.
    pub async fn delete(&self, identifier: &str) -> CorralResult<()> {
        let network = resolve_network(self.networks.as_ref(), identifier).await?;
        network.delete().await?;
        tracing::info!(id = network.id(), name = network.name(), "Network deleted");
        Ok(())
    }
}
