// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The global VXLAN identifier pool.
//!
//! Structurally the same as the VLAN pool, over one flat 24-bit space keyed
//! by [`Vni`]. The only extra rule lives in [`VniPool::sync`]: a single
//! configured range spanning more than [`MAX_RANGE_SPAN`] identifiers is
//! skipped outright, so a typo cannot expand millions of records into the
//! table.

use std::collections::BTreeSet;

use config::VniRanges;
use net::Vni;
use tracing::{debug, error, warn};

use crate::PoolError;
use crate::store::Store;

/// Largest number of identifiers a single configured range may span before
/// synchronization refuses to expand it.
pub const MAX_RANGE_SPAN: u64 = 1_000_000;

/// One VXLAN allocation record, as seen by callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VniAllocation {
    /// The VXLAN network identifier.
    pub vni: Vni,
    /// Whether a network currently holds this identifier.
    pub allocated: bool,
}

/// The VXLAN identifier pool.
#[derive(Default)]
pub struct VniPool {
    store: Store<Vni, bool>,
}

impl VniPool {
    /// New, empty pool. Call [`VniPool::sync`] to populate it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the allocation table with the configured ranges.
    ///
    /// Same contract as [`VlanPool::sync`][crate::VlanPool::sync], plus:
    /// a range spanning more than [`MAX_RANGE_SPAN`] identifiers is skipped
    /// with an error log while the rest of the configuration is still
    /// applied.
    pub fn sync(&self, ranges: &VniRanges) {
        self.store.mutate(|txn| {
            let mut wanted: BTreeSet<Vni> = BTreeSet::new();
            for range in ranges.iter() {
                if range.span() > MAX_RANGE_SPAN {
                    error!(
                        "skipping unreasonable VXLAN ID range {}:{}",
                        range.min(),
                        range.max()
                    );
                    continue;
                }
                for raw in range.min().as_u32()..=range.max().as_u32() {
                    if let Ok(vni) = Vni::new_checked(raw) {
                        wanted.insert(vni);
                    }
                }
            }
            for (vni, allocated) in txn.records() {
                if !wanted.remove(&vni) && !allocated {
                    debug!("removing vxlan {vni} from pool");
                    txn.delete(&vni);
                }
            }
            for vni in wanted {
                txn.insert(vni, false);
            }
        });
    }

    /// Reserve any free identifier with `min <= id <= max`.
    ///
    /// Selection is deterministic: the lowest free identifier wins.
    ///
    /// # Errors
    ///
    /// [`PoolError::VniExhausted`] when no free identifier is in range.
    pub fn reserve_any(&self, min: Vni, max: Vni) -> Result<Vni, PoolError> {
        self.store.transaction(|txn| {
            let hit = txn.find(|&vni, &allocated| !allocated && vni >= min && vni <= max);
            match hit {
                Some((vni, _)) => {
                    debug!("reserving vxlan {vni} from pool");
                    txn.insert(vni, true);
                    Ok(vni)
                }
                None => Err(PoolError::VniExhausted { min, max }),
            }
        })
    }

    /// Reserve one specific identifier.
    ///
    /// An identifier outside the configured ranges is tracked from here on
    /// as an allocated out-of-pool record.
    ///
    /// # Errors
    ///
    /// [`PoolError::VniInUse`] when the identifier is already held.
    pub fn reserve_specific(&self, vni: Vni) -> Result<(), PoolError> {
        self.store.transaction(|txn| match txn.get(&vni).copied() {
            Some(true) => Err(PoolError::VniInUse(vni)),
            Some(false) => {
                debug!("reserving specific vxlan {vni} from pool");
                txn.insert(vni, true);
                Ok(())
            }
            None => {
                debug!("reserving specific vxlan {vni} outside pool");
                txn.insert(vni, true);
                Ok(())
            }
        })
    }

    /// Release an identifier against the current configuration: a
    /// still-configured identifier returns to the pool, an out-of-range one
    /// is dropped from the table. Releasing an unknown identifier is a
    /// logged no-op.
    pub fn release(&self, vni: Vni, ranges: &VniRanges) {
        self.store.mutate(|txn| {
            if txn.get(&vni).is_none() {
                warn!("vxlan {vni} not found");
                return;
            }
            if ranges.contains(vni) {
                debug!("releasing vxlan {vni} to pool");
                txn.insert(vni, false);
            } else {
                debug!("releasing vxlan {vni} outside pool");
                txn.delete(&vni);
            }
        });
    }

    /// Look up one allocation record.
    #[must_use]
    pub fn get(&self, vni: Vni) -> Option<VniAllocation> {
        self.store.read(|table| {
            table
                .get(&vni)
                .map(|&allocated| VniAllocation { vni, allocated })
        })
    }

    /// All allocation records in identifier order.
    #[must_use]
    pub fn allocations(&self) -> Vec<VniAllocation> {
        self.store.read(|table| {
            table
                .iter()
                .map(|(&vni, &allocated)| VniAllocation { vni, allocated })
                .collect()
        })
    }
}
