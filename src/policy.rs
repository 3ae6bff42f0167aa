//! The profile policy lets a device decide which of the offered profiles to negotiate.
//!
//! The driver asks the policy after every fresh capability scan, see [`crate::Husb238::negotiate`].
use crate::profile::{Profile, ProfileSet};
use crate::tables::VoltageTier;

/// Trait for choosing a profile.
pub trait ProfilePolicy {
    /// Choose a profile from the offered ones, or `None` to leave the contract untouched.
    ///
    /// Defaults to the profile with the highest power.
    fn choose(&mut self, profiles: &ProfileSet) -> Option<VoltageTier> {
        profiles.highest_power().map(Profile::tier)
    }
}

/// Always go for the most power.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HighestPower;

impl ProfilePolicy for HighestPower {}

/// Request one specific voltage, if offered.
///
/// With `fallback`, the highest offered voltage below the target is used instead.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedVoltage {
    /// The desired tier.
    pub tier: VoltageTier,
    /// Accept a lower tier when the desired one is not offered.
    pub fallback: bool,
}

impl FixedVoltage {
    /// Request exactly `tier`.
    pub fn exact(tier: VoltageTier) -> Self {
        Self { tier, fallback: false }
    }

    /// Request `tier`, or the closest lower tier on offer.
    pub fn at_most(tier: VoltageTier) -> Self {
        Self { tier, fallback: true }
    }
}

impl ProfilePolicy for FixedVoltage {
    fn choose(&mut self, profiles: &ProfileSet) -> Option<VoltageTier> {
        if profiles.contains(self.tier) {
            return Some(self.tier);
        }

        if !self.fallback {
            return None;
        }

        profiles
            .iter()
            .map(Profile::tier)
            .filter(|tier| tier.volts() < self.tier.volts())
            .max_by_key(|tier| tier.volts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::CurrentCode;

    fn get_profiles() -> ProfileSet {
        let mut set = ProfileSet::new();
        set.push(Profile::new(VoltageTier::V5, CurrentCode::A3_0)).unwrap();
        set.push(Profile::new(VoltageTier::V9, CurrentCode::A3_0)).unwrap();
        set.push(Profile::new(VoltageTier::V15, CurrentCode::A3_0)).unwrap();
        set
    }

    #[test]
    fn test_highest_power() {
        assert_eq!(HighestPower.choose(&get_profiles()), Some(VoltageTier::V15));
        assert_eq!(HighestPower.choose(&ProfileSet::new()), None);
    }

    #[test]
    fn test_fixed_voltage() {
        let profiles = get_profiles();

        assert_eq!(FixedVoltage::exact(VoltageTier::V9).choose(&profiles), Some(VoltageTier::V9));
        assert_eq!(FixedVoltage::exact(VoltageTier::V12).choose(&profiles), None);
        assert_eq!(FixedVoltage::at_most(VoltageTier::V12).choose(&profiles), Some(VoltageTier::V9));
        assert_eq!(FixedVoltage::at_most(VoltageTier::V20).choose(&profiles), Some(VoltageTier::V15));
    }
}
