// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Segment identifier allocation pools.
//!
//! Virtual networks need an isolated layer-2 segment each, drawn from an
//! exhaustible shared identifier space: 802.1Q VLAN IDs scoped to a physical
//! network, or VXLAN network identifiers from one flat 24-bit space. This
//! crate tracks those spaces as allocation tables of `identifier ->
//! allocated` records and provides:
//!
//! * synchronization of a table against a freshly supplied configuration of
//!   allowed ranges, preserving whatever is currently allocated;
//! * reservation of any free identifier within a profile's range, or of one
//!   specific identifier (also outside the configured ranges, for flat and
//!   manually assigned segments);
//! * release with conditional eviction: identifiers that fell out of the
//!   configured ranges are dropped from the table instead of returned to it;
//! * a small append-only registry of VXLAN transport endpoints.
//!
//! Every operation runs as one atomically isolated unit of work against the
//! shared table, so two concurrent reservations can never hand out the same
//! identifier. The two pools are independent and share nothing.

pub mod endpoint;
mod errors;
pub mod profile;
mod store;
pub mod vlan;
pub mod vxlan;
#[cfg(test)]
mod vxlan_test;

pub use endpoint::{EndpointRegistry, VxlanEndpoint};
pub use errors::PoolError;
pub use profile::{SegmentBinding, SegmentManager, SegmentProfile};
pub use vlan::{VlanAllocation, VlanPool};
pub use vxlan::{VniAllocation, VniPool};
