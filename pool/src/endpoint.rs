// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Registry of VXLAN transport endpoints.
//!
//! Each host terminating VXLAN tunnels registers its IP address once and is
//! assigned a dense integer id, starting at 1. Registration is idempotent
//! and there is no deletion path; growth is bounded by the number of
//! physical hosts.

use std::net::IpAddr;

use tracing::debug;

use crate::store::Store;

/// One registered VXLAN transport endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VxlanEndpoint {
    /// Dense registry id, assigned on first registration.
    pub id: u32,
    /// Tunnel termination address, unique within the registry.
    pub ip_address: IpAddr,
}

/// Append-only endpoint registry keyed by IP address.
#[derive(Default)]
pub struct EndpointRegistry {
    store: Store<IpAddr, u32>,
}

impl EndpointRegistry {
    /// New, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint, or return the existing record unchanged.
    ///
    /// A new endpoint gets `max(existing ids) + 1`, or 1 for the first one.
    pub fn add_endpoint(&self, ip_address: IpAddr) -> VxlanEndpoint {
        self.store.mutate(|txn| {
            if let Some(&id) = txn.get(&ip_address) {
                return VxlanEndpoint { id, ip_address };
            }
            let id = txn
                .records()
                .iter()
                .map(|&(_, id)| id)
                .max()
                .unwrap_or(0)
                + 1;
            debug!("registering vxlan endpoint {ip_address} with id {id}");
            txn.insert(ip_address, id);
            VxlanEndpoint { id, ip_address }
        })
    }

    /// All registered endpoints in id order.
    #[must_use]
    pub fn list_endpoints(&self) -> Vec<VxlanEndpoint> {
        let mut endpoints: Vec<VxlanEndpoint> = self.store.read(|table| {
            table
                .iter()
                .map(|(&ip_address, &id)| VxlanEndpoint { id, ip_address })
                .collect()
        });
        endpoints.sort_by_key(|endpoint| endpoint.id);
        endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn ids_start_at_one_and_are_dense() {
        let registry = EndpointRegistry::new();
        assert_eq!(registry.add_endpoint(ip(1)).id, 1);
        assert_eq!(registry.add_endpoint(ip(2)).id, 2);
        assert_eq!(registry.add_endpoint(ip(3)).id, 3);
    }

    #[test]
    fn registration_is_idempotent() {
        let registry = EndpointRegistry::new();
        let first = registry.add_endpoint(ip(1));
        registry.add_endpoint(ip(2));
        let again = registry.add_endpoint(ip(1));
        assert_eq!(first, again);
        assert_eq!(registry.list_endpoints().len(), 2);
    }

    #[test]
    fn list_is_ordered_by_id() {
        let registry = EndpointRegistry::new();
        registry.add_endpoint(ip(9));
        registry.add_endpoint(ip(1));
        registry.add_endpoint(ip(5));
        let ids: Vec<u32> = registry.list_endpoints().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
