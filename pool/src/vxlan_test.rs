// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Tests for the VXLAN pool.

#[cfg(test)]
mod tests {
    use crate::vxlan::MAX_RANGE_SPAN;
    use crate::{PoolError, VniPool};
    use config::VniRanges;
    use net::Vni;
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    fn vni(raw: u32) -> Vni {
        Vni::new_checked(raw).unwrap()
    }
    fn ranges(s: &str) -> VniRanges {
        s.parse().unwrap()
    }

    #[test]
    fn sync_populates_the_pool_unallocated() {
        let pool = VniPool::new();
        pool.sync(&ranges("5000:5009"));
        let allocations = pool.allocations();
        assert_eq!(allocations.len(), 10);
        assert!(allocations.iter().all(|a| !a.allocated));
    }

    #[test]
    fn sync_is_idempotent() {
        let pool = VniPool::new();
        let config = ranges("5000:5009,7000:7009");
        pool.sync(&config);
        let first = pool.allocations();
        pool.sync(&config);
        assert_eq!(pool.allocations(), first);
    }

    #[test]
    fn sync_shrink_prunes_free_ids_but_keeps_allocated_ones() {
        let pool = VniPool::new();
        pool.sync(&ranges("5000:5009"));
        pool.reserve_specific(vni(5003)).unwrap();

        pool.sync(&ranges("7000:7009"));

        let kept = pool.get(vni(5003)).unwrap();
        assert!(kept.allocated);
        assert!(pool.get(vni(5000)).is_none());
        assert_eq!(pool.allocations().len(), 11);
    }

    #[traced_test]
    #[test]
    fn sync_skips_an_unreasonable_range_but_applies_the_rest() {
        let pool = VniPool::new();
        let config = format!("5000:5009,1000000:{}", 1_000_000 + MAX_RANGE_SPAN);
        pool.sync(&ranges(&config));
        assert!(logs_contain("unreasonable"));
        assert_eq!(pool.allocations().len(), 10);
        assert!(pool.get(vni(1_000_000)).is_none());
    }

    #[test]
    fn sync_accepts_a_range_at_exactly_the_span_limit() {
        let pool = VniPool::new();
        #[allow(clippy::cast_possible_truncation)]
        let max = 5000 + MAX_RANGE_SPAN as u32 - 1;
        pool.sync(&ranges(&format!("5000:{max}")));
        assert_eq!(pool.allocations().len() as u64, MAX_RANGE_SPAN);
    }

    #[test]
    fn reserve_any_drains_the_pool_then_exhausts() {
        let pool = VniPool::new();
        pool.sync(&ranges("5000:5002"));
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(pool.reserve_any(vni(5000), vni(5002)).unwrap());
        }
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 3);
        assert_eq!(
            pool.reserve_any(vni(5000), vni(5002)),
            Err(PoolError::VniExhausted {
                min: vni(5000),
                max: vni(5002),
            })
        );
    }

    #[test]
    fn reserve_any_respects_the_profile_range() {
        let pool = VniPool::new();
        pool.sync(&ranges("5000:5009"));
        let got = pool.reserve_any(vni(5005), vni(5009)).unwrap();
        assert!((5005..=5009).contains(&got.as_u32()));
    }

    #[test]
    fn concurrent_reserves_never_hand_out_the_same_id() {
        let pool = VniPool::new();
        pool.sync(&ranges("5000:5019"));
        let results = std::sync::Mutex::new(Vec::new());
        std::thread::scope(|scope| {
            for _ in 0..20 {
                scope.spawn(|| {
                    let got = pool.reserve_any(vni(5000), vni(5019)).unwrap();
                    results.lock().unwrap().push(got);
                });
            }
        });
        let mut ids = results.into_inner().unwrap();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20);
        assert!(pool.reserve_any(vni(5000), vni(5019)).is_err());
    }

    #[test]
    fn reserve_specific_is_exclusive_until_released() {
        let pool = VniPool::new();
        let config = ranges("5000:5009");
        pool.sync(&config);

        pool.reserve_specific(vni(5003)).unwrap();
        assert_eq!(
            pool.reserve_specific(vni(5003)),
            Err(PoolError::VniInUse(vni(5003)))
        );

        pool.release(vni(5003), &config);
        pool.reserve_specific(vni(5003)).unwrap();
    }

    #[test]
    fn reserve_specific_outside_the_pool_is_tracked() {
        let pool = VniPool::new();
        pool.reserve_specific(vni(90000)).unwrap();
        assert!(pool.get(vni(90000)).unwrap().allocated);
        // released outside any configured range, the record disappears
        pool.release(vni(90000), &ranges(""));
        assert!(pool.get(vni(90000)).is_none());
    }

    #[test]
    fn release_boundary_behavior() {
        let pool = VniPool::new();
        let config = ranges("5000:5009");
        pool.sync(&config);
        pool.reserve_specific(vni(5001)).unwrap();
        pool.reserve_specific(vni(5002)).unwrap();

        pool.release(vni(5001), &config);
        assert!(!pool.get(vni(5001)).unwrap().allocated);

        pool.release(vni(5002), &ranges("7000:7009"));
        assert!(pool.get(vni(5002)).is_none());
    }

    #[traced_test]
    #[test]
    fn releasing_an_unknown_vni_is_a_logged_no_op() {
        let pool = VniPool::new();
        pool.release(vni(5000), &ranges(""));
        assert!(logs_contain("not found"));
        assert!(pool.allocations().is_empty());
    }
}
