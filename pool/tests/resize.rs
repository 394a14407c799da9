// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! End-to-end lifecycle: populate, drain, release, and re-size the pools
//! through the [`SegmentManager`] front door.

use config::SegmentConfig;
use net::{Vid, Vni};
use segalloc_pool::{PoolError, SegmentBinding, SegmentManager, SegmentProfile};
use std::net::{IpAddr, Ipv4Addr};

fn vid(raw: u16) -> Vid {
    Vid::new(raw).unwrap()
}

#[test]
fn vlan_range_shift_preserves_in_use_segments() {
    let manager = SegmentManager::new();
    let config = SegmentConfig::parse("physnet1:10:19", "").unwrap();
    manager.sync(&config);
    assert_eq!(manager.vlan().allocations().len(), 10);

    // drain the pool
    let profile = SegmentProfile::Vlan {
        min: vid(10),
        max: vid(19),
    };
    let mut bindings = Vec::new();
    for _ in 0..10 {
        bindings.push(manager.allocate(&profile).unwrap());
    }
    let mut ids: Vec<u16> = bindings
        .iter()
        .map(|b| match b {
            SegmentBinding::Vlan { vlan_id, .. } => vlan_id.as_u16(),
            SegmentBinding::Vxlan { .. } => unreachable!("vlan profile"),
        })
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, (10..=19).collect::<Vec<u16>>());
    assert_eq!(
        manager.allocate(&profile),
        Err(PoolError::VlanExhausted {
            min: vid(10),
            max: vid(19),
        })
    );

    // give back id 15, then shift the configured range to 15-24
    let released = SegmentBinding::Vlan {
        physical_network: "physnet1".to_string(),
        vlan_id: vid(15),
    };
    manager.release(&released, &config);
    let shifted = SegmentConfig::parse("physnet1:15:24", "").unwrap();
    manager.sync(&shifted);

    // 10-14 are out of range but still in use, so they survive
    for raw in 10..=14 {
        let record = manager.vlan().get("physnet1", vid(raw)).unwrap();
        assert!(record.allocated);
    }
    // 15 was free and stays in the new range, 16-19 remain in use
    assert!(!manager.vlan().get("physnet1", vid(15)).unwrap().allocated);
    for raw in 16..=19 {
        assert!(manager.vlan().get("physnet1", vid(raw)).unwrap().allocated);
    }
    // 20-24 appear, free
    for raw in 20..=24 {
        assert!(!manager.vlan().get("physnet1", vid(raw)).unwrap().allocated);
    }
    assert_eq!(manager.vlan().allocations().len(), 15);

    // the freshly freed id is handed out again
    let profile = SegmentProfile::Vlan {
        min: vid(15),
        max: vid(24),
    };
    assert_eq!(
        manager.allocate(&profile).unwrap(),
        SegmentBinding::Vlan {
            physical_network: "physnet1".to_string(),
            vlan_id: vid(15),
        }
    );
}

#[test]
fn vxlan_profile_carries_its_multicast_group() {
    let manager = SegmentManager::new();
    let config = SegmentConfig::parse("", "5000:5009").unwrap();
    manager.sync(&config);

    let multicast = Ipv4Addr::new(239, 1, 1, 1);
    let profile = SegmentProfile::Vxlan {
        min: Vni::new_checked(5000).unwrap(),
        max: Vni::new_checked(5009).unwrap(),
        multicast,
    };
    let binding = manager.allocate(&profile).unwrap();
    let SegmentBinding::Vxlan { vni, multicast: got } = binding.clone() else {
        panic!("vxlan profile produced a vlan binding");
    };
    assert_eq!(vni.as_u32(), 5000);
    assert_eq!(got, multicast);

    manager.release(&binding, &config);
    assert!(!manager.vxlan().get(vni).unwrap().allocated);
}

#[test]
fn endpoints_register_through_the_manager() {
    let manager = SegmentManager::new();
    let first = manager.add_endpoint(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));
    let again = manager.add_endpoint(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));
    assert_eq!(first, again);
    assert_eq!(first.id, 1);
    assert_eq!(manager.list_endpoints().len(), 1);
}
