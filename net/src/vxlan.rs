// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! VXLAN network identifier validation.

use core::fmt::Display;
use core::fmt::Formatter;
use core::num::NonZero;

use crate::SegmentId;

/// A [VXLAN][RFC7348] Network Identifier.
///
/// A `Vni` is a 24-bit value naming one overlay segment.
///
/// # Legal values
///
/// * Value `0` is reserved by many implementations and is rejected here;
///   allowing it would poison the [`NonZero`] niche and buys nothing since
///   no deployment hands it out.
/// * The maximum legal value is <var>2<sup>24</sup> - 1 = 16,777,215</var>.
///
/// It is deliberately not possible to create a `Vni` from a `u32` directly;
/// use [`Vni::new_checked`] so that illegal values are caught at the edge.
///
/// This type is marked `#[repr(transparent)]` over [`NonZero<u32>`], so
/// [`Option<Vni>`] has the same size and alignment as `u32`.
///
/// [RFC7348]: https://datatracker.ietf.org/doc/html/rfc7348#section-5
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
#[repr(transparent)]
pub struct Vni(NonZero<u32>);

impl Display for Vni {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0.get())
    }
}

impl Vni {
    /// The minimum legal [`Vni`] value (1).
    pub const MIN: u32 = 1;
    /// The maximum legal [`Vni`] value (2<sup>24</sup> - 1).
    pub const MAX: u32 = 0x00_FF_FF_FF;

    /// Create a new [`Vni`] from a `u32`.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidVni`] error if the value is 0 or greater than
    /// [`Vni::MAX`].
    pub fn new_checked(vni: u32) -> Result<Vni, InvalidVni> {
        match NonZero::<u32>::new(vni) {
            None => Err(InvalidVni::ReservedZero),
            _ if vni > Vni::MAX => Err(InvalidVni::TooLarge(vni)),
            Some(vni) => Ok(Vni(vni)),
        }
    }

    /// Get the value of the [`Vni`] as a `u32`.
    #[must_use]
    pub fn as_u32(self) -> u32 {
        self.0.get()
    }
}

impl SegmentId for Vni {
    fn to_u32(self) -> u32 {
        self.as_u32()
    }
}

/// Errors that can occur when converting a `u32` to a [`Vni`].
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InvalidVni {
    /// Zero is not a legal Vni in many EVPN / VXLAN implementations.
    #[error("Zero is not a legal Vni")]
    ReservedZero,
    /// Carries the (illegal) value used to attempt creation of a [`Vni`].
    #[error("The value {0} is too large to be a Vni (max is {MAX})", MAX = Vni::MAX)]
    TooLarge(u32),
}

impl From<Vni> for u32 {
    fn from(vni: Vni) -> u32 {
        vni.as_u32()
    }
}

impl TryFrom<u32> for Vni {
    type Error = InvalidVni;

    fn try_from(vni: u32) -> Result<Vni, Self::Error> {
        Vni::new_checked(vni)
    }
}

#[cfg(any(test, feature = "bolero"))]
mod contract {
    use crate::vxlan::Vni;
    use bolero::{Driver, TypeGenerator};

    impl TypeGenerator for Vni {
        fn generate<D: Driver>(u: &mut D) -> Option<Self> {
            let raw: u32 = u.produce::<u32>()? & Vni::MAX;
            let raw = if raw == 0 { Vni::MIN } else { raw };
            Some(Vni::new_checked(raw).unwrap_or_else(|e| unreachable!("{e:?}")))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_is_not_a_legal_vni() {
        assert_eq!(Vni::new_checked(0).unwrap_err(), InvalidVni::ReservedZero);
    }

    #[test]
    fn one_is_a_legal_vni() {
        assert_eq!(Vni::new_checked(1).unwrap().as_u32(), 1);
    }

    #[test]
    fn vni_max_is_a_legal_vni() {
        assert_eq!(Vni::new_checked(Vni::MAX).unwrap().as_u32(), Vni::MAX);
    }

    #[test]
    fn vni_max_plus_one_is_not_a_legal_vni() {
        assert_eq!(
            Vni::new_checked(Vni::MAX + 1).unwrap_err(),
            InvalidVni::TooLarge(Vni::MAX + 1)
        );
    }

    #[test]
    fn generated_vnis_are_legal() {
        bolero::check!().with_type::<Vni>().for_each(|vni| {
            assert!((Vni::MIN..=Vni::MAX).contains(&vni.as_u32()));
        });
    }
}
