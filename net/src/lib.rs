// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::all, clippy::pedantic)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Strictly validated layer-2 segment identifier types.
//!
//! Segment pools hand out identifiers from exhaustible integer spaces. The
//! types in this crate make illegal identifiers unrepresentable so that the
//! pools never have to re-validate what they store.

pub mod vlan;
pub mod vxlan;

pub use vlan::{InvalidVid, Vid};
pub use vxlan::{InvalidVni, Vni};

/// Common surface of the segment identifier types, used by range
/// configuration code that is generic over the identifier domain.
pub trait SegmentId: Copy + Ord + core::fmt::Display {
    /// Widen the identifier to a `u32` for arithmetic and diagnostics.
    fn to_u32(self) -> u32;
}
