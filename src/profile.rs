//! Power profiles that an attached source offers.
use heapless::Vec;
use uom::si::power::milliwatt;

use crate::error::ProfileError;
use crate::tables::{CurrentCode, VoltageTier};
use crate::units::{ElectricCurrent, ElectricPotential, Power};

/// The number of voltage tiers that the chip can report.
pub const MAX_PROFILES: usize = VoltageTier::ALL.len();

/// A fixed supply offer of the attached source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ProfileFields"))]
pub struct Profile {
    tier: VoltageTier,
    current_code: CurrentCode,
    raw_power: u32,
}

impl Profile {
    /// Create a profile from a tier and the current code of its capability register.
    ///
    /// The power is derived here, once.
    pub fn new(tier: VoltageTier, current_code: CurrentCode) -> Self {
        Self {
            tier,
            current_code,
            raw_power: u32::from(tier.volts()) * u32::from(current_code.milliamps()),
        }
    }

    /// The voltage tier of this profile.
    pub fn tier(&self) -> VoltageTier {
        self.tier
    }

    /// The advertised current code.
    pub fn current_code(&self) -> CurrentCode {
        self.current_code
    }

    /// Voltage in volts.
    pub fn raw_voltage(&self) -> u8 {
        self.tier.volts()
    }

    /// Maximum current in milliamperes.
    pub fn raw_current(&self) -> u16 {
        self.current_code.milliamps()
    }

    /// Maximum power as volts times milliamperes.
    ///
    /// Divide by 1000 to obtain watts.
    pub fn raw_power(&self) -> u32 {
        self.raw_power
    }

    /// The voltage of this profile.
    pub fn voltage(&self) -> ElectricPotential {
        self.tier.voltage()
    }

    /// The maximum current of this profile.
    pub fn current(&self) -> ElectricCurrent {
        self.current_code.current()
    }

    /// The maximum power of this profile.
    pub fn power(&self) -> Power {
        Power::new::<milliwatt>(self.raw_power as f32)
    }
}

/// The deserializable part of a profile. The power is always recomputed.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ProfileFields {
    tier: VoltageTier,
    current_code: CurrentCode,
}

#[cfg(feature = "serde")]
impl TryFrom<ProfileFields> for Profile {
    type Error = ProfileError;

    fn try_from(fields: ProfileFields) -> Result<Self, Self::Error> {
        if fields.tier == VoltageTier::Unattached {
            return Err(ProfileError::Unattached);
        }

        Ok(Self::new(fields.tier, fields.current_code))
    }
}

/// The profiles found by one capability scan, in ascending register order.
///
/// Only tiers that the source offers are contained, so every entry is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<Profile, MAX_PROFILES>"))]
pub struct ProfileSet(pub(crate) Vec<Profile, MAX_PROFILES>);

impl ProfileSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// The number of offered profiles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Determine, whether the source offers no profile at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the profiles.
    pub fn profiles(&self) -> &[Profile] {
        &self.0
    }

    /// Iterate over the profiles.
    pub fn iter(&self) -> core::slice::Iter<'_, Profile> {
        self.0.iter()
    }

    /// Find the profile for a voltage tier.
    pub fn get(&self, tier: VoltageTier) -> Option<&Profile> {
        self.0.iter().find(|profile| profile.tier == tier)
    }

    /// Determine, whether a voltage tier is offered.
    pub fn contains(&self, tier: VoltageTier) -> bool {
        self.get(tier).is_some()
    }

    /// The profile with the highest power.
    ///
    /// On equal power, the higher voltage wins.
    pub fn highest_power(&self) -> Option<&Profile> {
        self.0.iter().max_by_key(|profile| (profile.raw_power, profile.raw_voltage()))
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    /// Append a profile. Returns the profile back if the set is full.
    pub(crate) fn push(&mut self, profile: Profile) -> Result<(), Profile> {
        self.0.push(profile)
    }
}

/// Accepts profiles as a scan would produce them: attached tiers, unique and ascending.
impl TryFrom<Vec<Profile, MAX_PROFILES>> for ProfileSet {
    type Error = ProfileError;

    fn try_from(profiles: Vec<Profile, MAX_PROFILES>) -> Result<Self, Self::Error> {
        let mut previous = VoltageTier::Unattached;

        for profile in &profiles {
            if profile.tier == VoltageTier::Unattached {
                return Err(ProfileError::Unattached);
            }

            if u8::from(profile.tier) <= u8::from(previous) {
                return Err(ProfileError::OutOfOrder(profile.tier));
            }

            previous = profile.tier;
        }

        Ok(Self(profiles))
    }
}

impl<'a> IntoIterator for &'a ProfileSet {
    type Item = &'a Profile;
    type IntoIter = core::slice::Iter<'a, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
