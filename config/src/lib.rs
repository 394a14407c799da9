// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Allowed-range configuration for the segment allocation pools.
//!
//! Operators describe which identifiers each pool may hand out as lists of
//! inclusive ranges: VLAN ranges are scoped to a named physical network,
//! VXLAN ranges form one flat list. This crate owns the range types, their
//! validation, and the parsers for the operator-facing syntax
//! (`physnet[:min:max]` and `min:max` lists).
//!
//! Configuration here only says what is *allowable*; reconciling it against
//! what is currently allocated is the pool crate's job.

mod errors;
mod ranges;

pub use errors::ConfigError;
pub use ranges::{IdRange, SegmentConfig, VlanRanges, VniRanges};
