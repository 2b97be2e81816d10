//! Wire-stable resource descriptors for networks and endpoints.
//!
//! Resources are built fresh on every read and never cached. Field names
//! follow the established wire format, so existing clients keep parsing.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::directory::{Endpoint, Network};

/// Serializable snapshot of a network and its attached containers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkResource {
    /// Engine-assigned network ID.
    #[serde(rename = "Id")]
    pub id: String,
    /// User-chosen network name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Backing driver tag.
    #[serde(rename = "Driver")]
    pub driver: String,
    /// Attached containers keyed by container ID.
    ///
    /// Only endpoints that currently have a sandbox appear here.
    #[serde(rename = "Containers")]
    pub containers: HashMap<String, EndpointResource>,
}

/// Serializable snapshot of one endpoint's addressing.
///
/// Every field is either a canonically formatted string or empty; callers
/// must treat the empty string as "not assigned".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointResource {
    /// Endpoint ID within its network.
    #[serde(rename = "EndpointID")]
    pub endpoint_id: String,
    /// MAC address in colon-separated form, or empty.
    #[serde(rename = "MacAddress")]
    pub mac_address: String,
    /// IPv4 address in `addr/prefix` form, or empty.
    #[serde(rename = "IPv4Address")]
    pub ipv4_address: String,
    /// IPv6 address in `addr/prefix` form, or empty.
    #[serde(rename = "IPv6Address")]
    pub ipv6_address: String,
}

/// Build the resource view of a network.
///
/// `None` yields the zero-valued resource. Endpoints without a sandbox are
/// silently omitted from the `containers` map.
#[must_use]
pub fn build_network_resource(network: Option<&dyn Network>) -> NetworkResource {
    let mut resource = NetworkResource::default();
    let Some(network) = network else {
        return resource;
    };

    resource.id = network.id().to_string();
    resource.name = network.name().to_string();
    resource.driver = network.driver().to_string();
    for endpoint in network.endpoints() {
        let Some(sandbox) = endpoint.info().sandbox else {
            continue;
        };
        resource.containers.insert(
            sandbox.container_id,
            build_endpoint_resource(Some(endpoint.as_ref())),
        );
    }
    resource
}

/// Build the resource view of an endpoint.
///
/// `None` yields the zero-valued resource. Address fields are rendered only
/// when actually assigned, never as a bogus non-empty string.
#[must_use]
pub fn build_endpoint_resource(endpoint: Option<&dyn Endpoint>) -> EndpointResource {
    let mut resource = EndpointResource::default();
    let Some(endpoint) = endpoint else {
        return resource;
    };

    resource.endpoint_id = endpoint.id().to_string();
    if let Some(iface) = endpoint.info().iface {
        if let Some(mac) = iface.mac {
            resource.mac_address = mac.to_string();
        }
        if let Some(ipv4) = iface.ipv4 {
            resource.ipv4_address = ipv4.to_string();
        }
        if let Some(ipv6) = iface.ipv6 {
            resource.ipv6_address = ipv6.to_string();
        }
    }
    resource
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EndpointInfo, Interface, IpNet, MacAddress, SandboxInfo};
    use corral_common::CorralResult;
    use std::net::{IpAddr, Ipv4Addr};
    use std::sync::Arc;

    struct StubNetwork {
        id: &'static str,
        name: &'static str,
        driver: &'static str,
        endpoints: Vec<Arc<dyn Endpoint>>,
    }

    #[async_trait::async_trait]
    impl Network for StubNetwork {
        fn id(&self) -> &str {
            self.id
        }
        fn name(&self) -> &str {
            self.name
        }
        fn driver(&self) -> &str {
            self.driver
        }
        fn options(&self) -> HashMap<String, String> {
            HashMap::new()
        }
        fn endpoints(&self) -> Vec<Arc<dyn Endpoint>> {
            self.endpoints.clone()
        }
        async fn delete(&self) -> CorralResult<()> {
            Ok(())
        }
    }

    struct StubEndpoint {
        id: &'static str,
        info: EndpointInfo,
    }

    impl Endpoint for StubEndpoint {
        fn id(&self) -> &str {
            self.id
        }
        fn info(&self) -> EndpointInfo {
            self.info.clone()
        }
    }

    fn attached(id: &'static str, container_id: &str) -> Arc<dyn Endpoint> {
        Arc::new(StubEndpoint {
            id,
            info: EndpointInfo {
                sandbox: Some(SandboxInfo {
                    container_id: container_id.to_string(),
                }),
                iface: Some(Interface {
                    mac: Some(MacAddress::new([0x02, 0x42, 0xac, 0x12, 0x00, 0x02])),
                    ipv4: Some(IpNet::new(IpAddr::V4(Ipv4Addr::new(172, 18, 0, 2)), 16)),
                    ipv6: None,
                }),
            },
        })
    }

    #[test]
    fn nil_inputs_yield_zero_valued_resources() {
        assert_eq!(build_network_resource(None), NetworkResource::default());
        assert_eq!(build_endpoint_resource(None), EndpointResource::default());
    }

    #[test]
    fn network_without_endpoints_has_empty_containers() {
        let network = StubNetwork {
            id: "net-1",
            name: "web",
            driver: "bridge",
            endpoints: vec![],
        };
        let resource = build_network_resource(Some(&network));
        assert_eq!(resource.id, "net-1");
        assert_eq!(resource.name, "web");
        assert_eq!(resource.driver, "bridge");
        assert!(resource.containers.is_empty());
    }

    #[test]
    fn sandboxless_endpoints_are_omitted() {
        let detached: Arc<dyn Endpoint> = Arc::new(StubEndpoint {
            id: "ep-0",
            info: EndpointInfo::default(),
        });
        let network = StubNetwork {
            id: "net-1",
            name: "web",
            driver: "bridge",
            endpoints: vec![detached, attached("ep-1", "c1")],
        };
        let resource = build_network_resource(Some(&network));
        assert_eq!(resource.containers.len(), 1);
        assert_eq!(resource.containers["c1"].endpoint_id, "ep-1");
    }

    #[test]
    fn unset_addresses_render_empty() {
        let endpoint = StubEndpoint {
            id: "ep-1",
            info: EndpointInfo {
                sandbox: None,
                iface: Some(Interface {
                    mac: None,
                    ipv4: Some(IpNet::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)), 24)),
                    ipv6: None,
                }),
            },
        };
        let resource = build_endpoint_resource(Some(&endpoint));
        assert_eq!(resource.endpoint_id, "ep-1");
        assert_eq!(resource.mac_address, "");
        assert_eq!(resource.ipv4_address, "10.0.0.7/24");
        assert_eq!(resource.ipv6_address, "");
    }

    #[test]
    fn wire_keys_are_stable() {
        let network = StubNetwork {
            id: "net-1",
            name: "web",
            driver: "bridge",
            endpoints: vec![attached("ep-1", "c1")],
        };
        let json = serde_json::to_value(build_network_resource(Some(&network))).unwrap();
        assert!(json.get("Id").is_some());
        assert!(json.get("Name").is_some());
        assert!(json.get("Driver").is_some());
        let endpoint = &json["Containers"]["c1"];
        assert!(endpoint.get("EndpointID").is_some());
        assert!(endpoint.get("MacAddress").is_some());
        assert!(endpoint.get("IPv4Address").is_some());
        assert!(endpoint.get("IPv6Address").is_some());
    }
}
