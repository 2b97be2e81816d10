//! Endpoint interface value types.
//!
//! Every field an endpoint may or may not carry (MAC, IPv4, IPv6, sandbox)
//! is an explicit `Option` so the "omit if absent" rendering rule in
//! [`crate::resource`] is enforced by the type system rather than by
//! sentinel checks.

use std::fmt;
use std::net::IpAddr;

/// A MAC address rendered in canonical colon-separated form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Create a MAC address from raw octets.
    #[must_use]
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Get the raw octets.
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

/// An IP address with its routing prefix length, rendered as `addr/prefix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpNet {
    /// The address part.
    pub addr: IpAddr,
    /// The prefix length in bits.
    pub prefix_len: u8,
}

impl IpNet {
    /// Create a new address/prefix pair.
    #[must_use]
    pub const fn new(addr: IpAddr, prefix_len: u8) -> Self {
        Self { addr, prefix_len }
    }
}

impl fmt::Display for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

/// Interface descriptor of an endpoint.
///
/// All fields stay `None` until the endpoint is actually attached to a
/// sandbox.
#[derive(Debug, Clone, Default)]
pub struct Interface {
    /// Hardware address, if assigned.
    pub mac: Option<MacAddress>,
    /// IPv4 address with prefix, if assigned.
    pub ipv4: Option<IpNet>,
    /// IPv6 address with prefix, if assigned.
    pub ipv6: Option<IpNet>,
}

/// The sandbox (per-container network namespace) an endpoint is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxInfo {
    /// ID of the container owning the namespace.
    pub container_id: String,
}

/// Snapshot of an endpoint's attachment state.
#[derive(Debug, Clone, Default)]
pub struct EndpointInfo {
    /// The attached sandbox, or `None` while the endpoint is detached.
    pub sandbox: Option<SandboxInfo>,
    /// The interface descriptor, or `None` before attachment.
    pub iface: Option<Interface>,
}
