//! Errors reported by the driver.
use crate::tables::VoltageTier;

/// Errors that can occur when talking to the HUSB238.
///
/// `E` is the error type of the underlying I2C bus.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A bus transaction was not acknowledged or failed otherwise.
    #[error("bus transaction failed: {0:?}")]
    Bus(E),
    /// The requested tier is not part of the last scanned profiles.
    #[error("{0:?} is not offered by the attached source")]
    ProfileNotOffered(VoltageTier),
}

/// Reasons for rejecting profile data that did not come from a capability scan.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProfileError {
    /// Profiles always have a voltage.
    #[error("a profile cannot be unattached")]
    Unattached,
    /// Profiles must be unique and in ascending tier order.
    #[error("{0:?} is out of ascending tier order")]
    OutOfOrder(VoltageTier),
}
