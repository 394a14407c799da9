// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Inclusive identifier ranges and the operator-facing range syntax.

use std::collections::BTreeMap;
use std::str::FromStr;

use net::{SegmentId, Vid, Vni};
use tracing::debug;

use crate::ConfigError;

/// An inclusive range of segment identifiers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdRange<I> {
    min: I,
    max: I,
}

impl<I: SegmentId> IdRange<I> {
    /// Build a range, rejecting inverted bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBounds`] when `min > max`.
    pub fn new(min: I, max: I) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidBounds {
                min: min.to_u32(),
                max: max.to_u32(),
            });
        }
        Ok(Self { min, max })
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub fn min(&self) -> I {
        self.min
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub fn max(&self) -> I {
        self.max
    }

    /// Whether `id` falls within the range.
    #[must_use]
    pub fn contains(&self, id: I) -> bool {
        self.min <= id && id <= self.max
    }

    /// Number of identifiers the range spans.
    #[must_use]
    pub fn span(&self) -> u64 {
        u64::from(self.max.to_u32() - self.min.to_u32()) + 1
    }
}

/// Allocatable VLAN ranges, scoped per physical network.
///
/// A physical network may be registered with no ranges at all; such a trunk
/// carries only flat or manually assigned segments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VlanRanges {
    by_physnet: BTreeMap<String, Vec<IdRange<Vid>>>,
}

impl VlanRanges {
    /// New, empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a physical network, with no ranges yet.
    pub fn add_physical_network(&mut self, physical_network: &str) {
        self.by_physnet
            .entry(physical_network.to_string())
            .or_default();
    }

    /// Add an allocatable range to a physical network, registering the
    /// network if needed.
    pub fn add_range(&mut self, physical_network: &str, range: IdRange<Vid>) {
        self.by_physnet
            .entry(physical_network.to_string())
            .or_default()
            .push(range);
    }

    /// Whether `vid` is allocatable on `physical_network`.
    #[must_use]
    pub fn contains(&self, physical_network: &str, vid: Vid) -> bool {
        self.by_physnet
            .get(physical_network)
            .is_some_and(|ranges| ranges.iter().any(|r| r.contains(vid)))
    }

    /// Iterate over `(physical network, ranges)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[IdRange<Vid>])> {
        self.by_physnet
            .iter()
            .map(|(name, ranges)| (name.as_str(), ranges.as_slice()))
    }

    /// True when no physical network is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_physnet.is_empty()
    }
}

impl FromStr for VlanRanges {
    type Err = ConfigError;

    /// Parse the operator syntax: a comma-separated list where each entry is
    /// either `physnet:min:max` or a bare `physnet` name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ranges = VlanRanges::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            if entry.contains(':') {
                let [physnet, min, max]: [&str; 3] = entry
                    .split(':')
                    .collect::<Vec<_>>()
                    .try_into()
                    .map_err(|_| ConfigError::InvalidRangeEntry(entry.to_string()))?;
                let min = parse_vid(min)?;
                let max = parse_vid(max)?;
                ranges.add_range(physnet.trim(), IdRange::new(min, max)?);
            } else {
                ranges.add_physical_network(entry);
            }
        }
        debug!("parsed network VLAN ranges: {ranges:?}");
        Ok(ranges)
    }
}

fn parse_vid(s: &str) -> Result<Vid, ConfigError> {
    s.trim()
        .parse::<u16>()
        .ok()
        .and_then(|raw| Vid::new(raw).ok())
        .ok_or_else(|| ConfigError::InvalidVlanId(s.trim().to_string()))
}

/// Allocatable VXLAN identifier ranges, one flat list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VniRanges {
    ranges: Vec<IdRange<Vni>>,
}

impl VniRanges {
    /// New, empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an allocatable range.
    pub fn add_range(&mut self, range: IdRange<Vni>) {
        self.ranges.push(range);
    }

    /// Whether `vni` is allocatable.
    #[must_use]
    pub fn contains(&self, vni: Vni) -> bool {
        self.ranges.iter().any(|r| r.contains(vni))
    }

    /// Iterate over the configured ranges.
    pub fn iter(&self) -> impl Iterator<Item = &IdRange<Vni>> {
        self.ranges.iter()
    }

    /// True when no range is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl FromStr for VniRanges {
    type Err = ConfigError;

    /// Parse the operator syntax: a comma-separated list of `min:max`
    /// entries.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut ranges = VniRanges::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let [min, max]: [&str; 2] = entry
                .split(':')
                .collect::<Vec<_>>()
                .try_into()
                .map_err(|_| ConfigError::InvalidRangeEntry(entry.to_string()))?;
            let min = parse_vni(min)?;
            let max = parse_vni(max)?;
            ranges.add_range(IdRange::new(min, max)?);
        }
        debug!("parsed VXLAN ID ranges: {ranges:?}");
        Ok(ranges)
    }
}

fn parse_vni(s: &str) -> Result<Vni, ConfigError> {
    s.trim()
        .parse::<u32>()
        .ok()
        .and_then(|raw| Vni::new_checked(raw).ok())
        .ok_or_else(|| ConfigError::InvalidVni(s.trim().to_string()))
}

/// The complete allowed-range configuration both pools are synchronized
/// against.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentConfig {
    /// Per-physical-network VLAN ranges.
    pub vlan: VlanRanges,
    /// Flat VXLAN identifier ranges.
    pub vni: VniRanges,
}

impl SegmentConfig {
    /// Build a configuration from the two operator strings.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found in either list.
    pub fn parse(vlan_ranges: &str, vni_ranges: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            vlan: vlan_ranges.parse()?,
            vni: vni_ranges.parse()?,
        })
    }
}
