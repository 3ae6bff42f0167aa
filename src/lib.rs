//! Driver for the HUSB238 USB-PD sink controller.
//!
//! The HUSB238 negotiates a fixed supply contract (5 V to 20 V) with an attached
//! USB-PD source. Over I2C, it reports which voltages the source offers, and lets the
//! host select and request one of them.
//!
//! The driver is built on the [`embedded_hal::i2c::I2c`] trait and performs blocking
//! transactions only.
//!
//! ```ignore
//! use husb238::{HighestPower, Husb238, InitOutcome};
//!
//! let mut pd = Husb238::new(i2c);
//! if let InitOutcome::Ready(count) = pd.initialize() {
//!     let requested = pd.negotiate(&mut HighestPower)?;
//! }
//! ```
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

#[macro_use]
mod fmt;

pub mod driver;
pub mod error;
pub mod policy;
pub mod profile;
pub mod registers;
pub mod tables;
pub mod units;

#[cfg(test)]
mod dummy;

pub use driver::{ADDRESS, Husb238, InitOutcome};
pub use error::{Error, ProfileError};
pub use policy::{FixedVoltage, HighestPower, ProfilePolicy};
pub use profile::{MAX_PROFILES, Profile, ProfileSet};
pub use tables::{
    CcDirection, Contract5VCurrent, CurrentCode, PdResponse, PdoSelection, VoltageTier, current_code_to_milliamps,
    selector_to_voltage_tier, voltage_tier_to_selector,
};
