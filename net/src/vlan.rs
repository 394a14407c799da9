// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VLAN identifier validation.

use core::num::NonZero;

use crate::SegmentId;

/// An [802.1Q] VLAN Identifier.
///
/// A `Vid` names one isolated broadcast domain on a physical network.
///
/// # Legal values
///
/// * `0` means "the native vlan" on most switches and is never a legal
///   allocatable identifier.
/// * `4095` is reserved by the standard. It is not constructible through
///   [`Vid::new`], but the pools track flat (untagged) networks under the
///   distinguished sentinel [`Vid::FLAT`].
/// * Everything in `1..=4094` is allocatable.
///
/// This type is marked `#[repr(transparent)]` over [`NonZero<u16>`], so
/// [`Option<Vid>`] has the same size and alignment as `u16`. The cost of
/// using `Vid` instead of a raw `u16` is limited to the validation we should
/// be doing anyway.
///
/// [802.1Q]: https://en.wikipedia.org/wiki/IEEE_802.1Q
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u16", into = "u16"))]
#[repr(transparent)]
pub struct Vid(NonZero<u16>);

/// Errors which can occur when converting a `u16` to a validated [`Vid`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub enum InvalidVid {
    /// 0 identifies the native vlan and cannot be allocated.
    #[error("Zero is a reserved Vid")]
    Zero,
    /// 4095 is reserved by 802.1Q; see [`Vid::FLAT`].
    #[error("4095 is a reserved Vid")]
    Reserved,
    /// The value does not fit in 12 bits.
    #[error("{0} is too large to be a legal Vid (max is {MAX})", MAX = Vid::MAX)]
    TooLarge(u16),
}

impl Vid {
    /// The minimum legal VID value (1).
    pub const MIN: u16 = 1;
    /// The maximum legal VID value (4094).
    pub const MAX: u16 = 4094;
    /// The legal range of VID values.
    pub const LEGAL_RANGE: core::ops::RangeInclusive<u16> = Vid::MIN..=Vid::MAX;
    /// Sentinel under which flat (untagged) networks are tracked.
    ///
    /// The value is the 802.1Q reserved identifier 4095, which can never
    /// collide with an allocatable VID. It is deliberately not constructible
    /// through [`Vid::new`].
    pub const FLAT: Vid = match NonZero::new(4095) {
        Some(v) => Vid(v),
        None => unreachable!(),
    };

    /// Create a new [`Vid`] from a `u16`.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidVid`] error if the value is 0, 4095 (reserved),
    /// or greater than [`Vid::MAX`].
    pub fn new(vid: u16) -> Result<Self, InvalidVid> {
        match vid {
            4095 => Err(InvalidVid::Reserved),
            _ => match NonZero::<u16>::new(vid) {
                None => Err(InvalidVid::Zero),
                Some(val) if val.get() > Vid::MAX => Err(InvalidVid::TooLarge(val.get())),
                Some(val) => Ok(Vid(val)),
            },
        }
    }

    /// Get the value of the [`Vid`] as a `u16`.
    #[must_use]
    pub fn as_u16(self) -> u16 {
        self.0.get()
    }
}

impl SegmentId for Vid {
    fn to_u32(self) -> u32 {
        u32::from(self.as_u16())
    }
}

impl From<Vid> for u16 {
    fn from(vid: Vid) -> u16 {
        vid.as_u16()
    }
}

impl TryFrom<u16> for Vid {
    type Error = InvalidVid;

    fn try_from(vid: u16) -> Result<Vid, Self::Error> {
        Vid::new(vid)
    }
}

impl core::fmt::Display for Vid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use crate::vlan::Vid;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Vid {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let raw: u16 = u.produce::<u16>()? % (Vid::MAX + 1);
            let raw = if raw == 0 { Vid::MIN } else { raw };
            Some(Vid::new(raw).unwrap_or_else(|e| unreachable!("{e:?}")))
        }
    }
}
