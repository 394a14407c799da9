// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The per-physical-network VLAN identifier pool.
//!
//! Records are keyed by `(physical network, VLAN ID)`. The table holds every
//! identifier inside the configured ranges plus any allocated identifier
//! outside them (flat and manually assigned segments); unallocated
//! out-of-range records are pruned during synchronization.

use std::collections::BTreeSet;

use config::VlanRanges;
use net::Vid;
use tracing::{debug, warn};

use crate::PoolError;
use crate::store::Store;

/// Unique key of one VLAN allocation record.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct VlanKey {
    pub(crate) physical_network: String,
    pub(crate) vlan_id: Vid,
}

/// One VLAN allocation record, as seen by callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VlanAllocation {
    /// Name of the physical network the VLAN lives on.
    pub physical_network: String,
    /// The VLAN identifier.
    pub vlan_id: Vid,
    /// Whether a network currently holds this identifier.
    pub allocated: bool,
}

/// The VLAN identifier pool.
#[derive(Default)]
pub struct VlanPool {
    store: Store<VlanKey, bool>,
}

impl VlanPool {
    /// New, empty pool. Call [`VlanPool::sync`] to populate it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the allocation table with the configured ranges.
    ///
    /// Identifiers that are configured and already tracked are left alone;
    /// newly configured identifiers are inserted unallocated; unallocated
    /// identifiers that fell out of the configuration are dropped. Allocated
    /// records are never revoked, whatever the configuration says.
    /// Re-running with the same configuration is a no-op.
    pub fn sync(&self, ranges: &VlanRanges) {
        self.store.mutate(|txn| {
            let mut wanted: BTreeSet<VlanKey> = BTreeSet::new();
            for (physical_network, entries) in ranges.iter() {
                for range in entries {
                    for raw in range.min().as_u16()..=range.max().as_u16() {
                        if let Ok(vlan_id) = Vid::new(raw) {
                            wanted.insert(VlanKey {
                                physical_network: physical_network.to_string(),
                                vlan_id,
                            });
                        }
                    }
                }
            }
            for (key, allocated) in txn.records() {
                if !wanted.remove(&key) && !allocated {
                    debug!(
                        "removing vlan {} on physical network {} from pool",
                        key.vlan_id, key.physical_network
                    );
                    txn.delete(&key);
                }
            }
            for key in wanted {
                txn.insert(key, false);
            }
        });
    }

    /// Reserve any free VLAN with `min <= id <= max`, optionally constrained
    /// to one physical network. Returns the physical network and identifier
    /// actually reserved.
    ///
    /// Selection is deterministic: the free record with the lowest key wins.
    ///
    /// # Errors
    ///
    /// [`PoolError::VlanExhausted`] when no free identifier is in range.
    pub fn reserve_any(
        &self,
        min: Vid,
        max: Vid,
        physical_network: Option<&str>,
    ) -> Result<(String, Vid), PoolError> {
        self.store.transaction(|txn| {
            let hit = txn.find(|key, &allocated| {
                !allocated
                    && key.vlan_id >= min
                    && key.vlan_id <= max
                    && physical_network.is_none_or(|name| key.physical_network == name)
            });
            match hit {
                Some((key, _)) => {
                    debug!(
                        "reserving vlan {} on physical network {} from pool",
                        key.vlan_id, key.physical_network
                    );
                    txn.insert(key.clone(), true);
                    Ok((key.physical_network, key.vlan_id))
                }
                None => Err(PoolError::VlanExhausted { min, max }),
            }
        })
    }

    /// Reserve one specific VLAN on one physical network.
    ///
    /// An identifier outside the configured ranges is tracked from here on
    /// as an allocated out-of-pool record.
    ///
    /// # Errors
    ///
    /// [`PoolError::VlanInUse`] when the identifier is already held, or
    /// [`PoolError::FlatNetworkInUse`] when it is the flat-network sentinel.
    pub fn reserve_specific(&self, physical_network: &str, vlan_id: Vid) -> Result<(), PoolError> {
        let key = VlanKey {
            physical_network: physical_network.to_string(),
            vlan_id,
        };
        self.store.transaction(|txn| match txn.get(&key).copied() {
            Some(true) if vlan_id == Vid::FLAT => Err(PoolError::FlatNetworkInUse {
                physical_network: physical_network.to_string(),
            }),
            Some(true) => Err(PoolError::VlanInUse {
                physical_network: physical_network.to_string(),
                vlan_id,
            }),
            Some(false) => {
                debug!(
                    "reserving specific vlan {vlan_id} on physical network \
                     {physical_network} from pool"
                );
                txn.insert(key, true);
                Ok(())
            }
            None => {
                debug!(
                    "reserving specific vlan {vlan_id} on physical network \
                     {physical_network} outside pool"
                );
                txn.insert(key, true);
                Ok(())
            }
        })
    }

    /// Release a VLAN against the current configuration: a still-configured
    /// identifier returns to the pool, an out-of-range one is dropped from
    /// the table. Releasing an unknown identifier is a logged no-op.
    pub fn release(&self, physical_network: &str, vlan_id: Vid, ranges: &VlanRanges) {
        let key = VlanKey {
            physical_network: physical_network.to_string(),
            vlan_id,
        };
        self.store.mutate(|txn| {
            if txn.get(&key).is_none() {
                warn!("vlan {vlan_id} on physical network {physical_network} not found");
                return;
            }
            if ranges.contains(physical_network, vlan_id) {
                debug!("releasing vlan {vlan_id} on physical network {physical_network} to pool");
                txn.insert(key.clone(), false);
            } else {
                debug!(
                    "releasing vlan {vlan_id} on physical network {physical_network} outside pool"
                );
                txn.delete(&key);
            }
        });
    }

    /// Look up one allocation record.
    #[must_use]
    pub fn get(&self, physical_network: &str, vlan_id: Vid) -> Option<VlanAllocation> {
        let key = VlanKey {
            physical_network: physical_network.to_string(),
            vlan_id,
        };
        self.store.read(|table| {
            table.get(&key).map(|&allocated| VlanAllocation {
                physical_network: physical_network.to_string(),
                vlan_id,
                allocated,
            })
        })
    }

    /// All allocation records in `(physical network, id)` order.
    #[must_use]
    pub fn allocations(&self) -> Vec<VlanAllocation> {
        self.store.read(|table| {
            table
                .iter()
                .map(|(key, &allocated)| VlanAllocation {
                    physical_network: key.physical_network.clone(),
                    vlan_id: key.vlan_id,
                    allocated,
                })
                .collect()
        })
    }
}
