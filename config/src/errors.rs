// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Type for configuration / validation failures.

use thiserror::Error;

/// The reasons why we may reject a range configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A list entry did not match the expected `physnet:min:max` or
    /// `min:max` shape.
    #[error("invalid range entry '{0}'")]
    InvalidRangeEntry(String),
    /// A range with its bounds inverted.
    #[error("invalid range bounds {min}..={max}")]
    InvalidBounds {
        /// Lower bound as written.
        min: u32,
        /// Upper bound as written.
        max: u32,
    },
    /// A VLAN bound that is not a legal VLAN identifier.
    #[error("'{0}' is not a valid VLAN ID")]
    InvalidVlanId(String),
    /// A VXLAN bound that is not a legal VNI (zero is reserved).
    #[error("'{0}' is not a valid VNI")]
    InvalidVni(String),
}
