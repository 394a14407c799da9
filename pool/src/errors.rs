// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Errors surfaced by the allocation pools.
//!
//! Exhaustion is an expected, frequently retried condition reported to the
//! caller immediately; nothing in this crate retries internally. Lookups
//! that can miss return [`Option`] instead of an error, and releasing an
//! identifier that was never allocated is a logged no-op.

use net::{Vid, Vni};
use thiserror::Error;

/// The ways a reservation can fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// No free VLAN left within the requested range.
    #[error("no free VLAN ID in range {min}-{max}")]
    VlanExhausted {
        /// Lower bound of the requested range.
        min: Vid,
        /// Upper bound of the requested range.
        max: Vid,
    },
    /// No free VXLAN identifier left within the requested range.
    #[error("no free VXLAN ID in range {min}-{max}")]
    VniExhausted {
        /// Lower bound of the requested range.
        min: Vni,
        /// Upper bound of the requested range.
        max: Vni,
    },
    /// The requested VLAN is already held by another network.
    #[error("VLAN ID {vlan_id} on physical network '{physical_network}' is in use")]
    VlanInUse {
        /// Physical network the VLAN lives on.
        physical_network: String,
        /// The identifier that was requested.
        vlan_id: Vid,
    },
    /// The flat-network sentinel is already held on this physical network.
    #[error("flat network on physical network '{physical_network}' is in use")]
    FlatNetworkInUse {
        /// Physical network carrying the flat segment.
        physical_network: String,
    },
    /// The requested VXLAN identifier is already held by another network.
    #[error("VXLAN ID {0} is in use")]
    VniInUse(Vni),
}
