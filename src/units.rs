//! Physical quantities used throughout the driver.
pub use uom::si::f32::{ElectricCurrent, ElectricPotential, Power};
