// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Segment profiles and the network-facing dispatch point.
//!
//! A network profile describes which segment technology a network gets and
//! from which identifier range; [`SegmentManager`] is the single place that
//! dispatches on the profile variant and drives the matching pool.

use std::net::Ipv4Addr;

use config::SegmentConfig;
use net::{Vid, Vni};

use crate::endpoint::{EndpointRegistry, VxlanEndpoint};
use crate::errors::PoolError;
use crate::vlan::VlanPool;
use crate::vxlan::VniPool;

/// The segment characteristics of a network profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentProfile {
    /// VLAN-backed segments drawn from `min..=max`.
    Vlan {
        /// Lowest identifier the profile may use.
        min: Vid,
        /// Highest identifier the profile may use.
        max: Vid,
    },
    /// VXLAN-backed segments drawn from `min..=max`, with the multicast
    /// group used for broadcast traffic on every segment of this profile.
    Vxlan {
        /// Lowest identifier the profile may use.
        min: Vni,
        /// Highest identifier the profile may use.
        max: Vni,
        /// Multicast group address shared by the profile's segments.
        multicast: Ipv4Addr,
    },
}

/// An isolated layer-2 segment bound to one network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SegmentBinding {
    /// A VLAN on a physical network.
    Vlan {
        /// The physical network the VLAN was reserved on.
        physical_network: String,
        /// The reserved identifier.
        vlan_id: Vid,
    },
    /// A VXLAN overlay segment.
    Vxlan {
        /// The reserved identifier.
        vni: Vni,
        /// Multicast group address, carried over from the profile.
        multicast: Ipv4Addr,
    },
}

/// Front door to both identifier pools and the endpoint registry.
///
/// The pools stay independently accessible through [`SegmentManager::vlan`]
/// and [`SegmentManager::vxlan`] for specific reservations and queries.
#[derive(Default)]
pub struct SegmentManager {
    vlan: VlanPool,
    vxlan: VniPool,
    endpoints: EndpointRegistry,
}

impl SegmentManager {
    /// New manager with empty pools.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile both pools with the supplied configuration.
    pub fn sync(&self, config: &SegmentConfig) {
        self.vlan.sync(&config.vlan);
        self.vxlan.sync(&config.vni);
    }

    /// Assign a segment to a new network according to its profile.
    ///
    /// # Errors
    ///
    /// Propagates the exhaustion error of the pool the profile selects.
    pub fn allocate(&self, profile: &SegmentProfile) -> Result<SegmentBinding, PoolError> {
        match profile {
            SegmentProfile::Vlan { min, max } => self
                .vlan
                .reserve_any(*min, *max, None)
                .map(|(physical_network, vlan_id)| SegmentBinding::Vlan {
                    physical_network,
                    vlan_id,
                }),
            SegmentProfile::Vxlan {
                min,
                max,
                multicast,
            } => self
                .vxlan
                .reserve_any(*min, *max)
                .map(|vni| SegmentBinding::Vxlan {
                    vni,
                    multicast: *multicast,
                }),
        }
    }

    /// Release whatever `binding` holds, against the current configuration.
    pub fn release(&self, binding: &SegmentBinding, config: &SegmentConfig) {
        match binding {
            SegmentBinding::Vlan {
                physical_network,
                vlan_id,
            } => self.vlan.release(physical_network, *vlan_id, &config.vlan),
            SegmentBinding::Vxlan { vni, .. } => self.vxlan.release(*vni, &config.vni),
        }
    }

    /// The VLAN pool.
    #[must_use]
    pub fn vlan(&self) -> &VlanPool {
        &self.vlan
    }

    /// The VXLAN pool.
    #[must_use]
    pub fn vxlan(&self) -> &VniPool {
        &self.vxlan
    }

    /// Register a VXLAN transport endpoint; idempotent.
    pub fn add_endpoint(&self, ip_address: std::net::IpAddr) -> VxlanEndpoint {
        self.endpoints.add_endpoint(ip_address)
    }

    /// All registered VXLAN transport endpoints.
    #[must_use]
    pub fn list_endpoints(&self) -> Vec<VxlanEndpoint> {
        self.endpoints.list_endpoints()
    }
}
