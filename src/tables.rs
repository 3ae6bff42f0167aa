//! Code tables of the HUSB238.
//!
//! The chip encodes voltages and currents as small enumerated codes. Two distinct
//! voltage encodings exist:
//!
//! - [`VoltageTier`] is used by the status register and by the capability registers.
//! - [`PdoSelection`] is used by the SRC_PDO register, when choosing a profile.
//!
//! The 15 V, 18 V and 20 V codes differ between both. Always convert explicitly.
use uom::si::electric_current::milliampere;
use uom::si::electric_potential::volt;

use crate::units::{ElectricCurrent, ElectricPotential};

/// Maximum source current, as advertised in a 4-bit current code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[allow(missing_docs)]
pub enum CurrentCode {
    A0_5 = 0b0000,
    A0_7 = 0b0001,
    A1_0 = 0b0010,
    A1_25 = 0b0011,
    A1_5 = 0b0100,
    A1_75 = 0b0101,
    A2_0 = 0b0110,
    A2_25 = 0b0111,
    A2_5 = 0b1000,
    A2_75 = 0b1001,
    A3_0 = 0b1010,
    A3_25 = 0b1011,
    A3_5 = 0b1100,
    A4_0 = 0b1101,
    A4_5 = 0b1110,
    A5_0 = 0b1111,
}

impl CurrentCode {
    /// The current in milliamperes.
    pub fn milliamps(self) -> u16 {
        match self {
            Self::A0_5 => 500,
            Self::A0_7 => 700,
            Self::A1_0 => 1000,
            Self::A1_25 => 1250,
            Self::A1_5 => 1500,
            Self::A1_75 => 1750,
            Self::A2_0 => 2000,
            Self::A2_25 => 2250,
            Self::A2_5 => 2500,
            Self::A2_75 => 2750,
            Self::A3_0 => 3000,
            Self::A3_25 => 3250,
            Self::A3_5 => 3500,
            Self::A4_0 => 4000,
            Self::A4_5 => 4500,
            Self::A5_0 => 5000,
        }
    }

    /// The current as a physical quantity.
    pub fn current(self) -> ElectricCurrent {
        ElectricCurrent::new::<milliampere>(self.milliamps().into())
    }
}

/// Converts a register nibble. Bits above the lowest four are ignored.
impl From<u8> for CurrentCode {
    fn from(value: u8) -> Self {
        match value & 0x0F {
            0b0000 => Self::A0_5,
            0b0001 => Self::A0_7,
            0b0010 => Self::A1_0,
            0b0011 => Self::A1_25,
            0b0100 => Self::A1_5,
            0b0101 => Self::A1_75,
            0b0110 => Self::A2_0,
            0b0111 => Self::A2_25,
            0b1000 => Self::A2_5,
            0b1001 => Self::A2_75,
            0b1010 => Self::A3_0,
            0b1011 => Self::A3_25,
            0b1100 => Self::A3_5,
            0b1101 => Self::A4_0,
            0b1110 => Self::A4_5,
            _ => Self::A5_0,
        }
    }
}

impl From<CurrentCode> for u8 {
    fn from(value: CurrentCode) -> Self {
        value as u8
    }
}

/// Look up the current in milliamperes for a raw current code.
///
/// Codes that do not fit into four bits are unknown and yield `0`.
pub fn current_code_to_milliamps(code: u8) -> u16 {
    if code > 0x0F {
        return 0;
    }

    CurrentCode::from(code).milliamps()
}

/// A voltage tier, as reported by the status and capability registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VoltageTier {
    /// No source attached, or an unknown code.
    #[default]
    Unattached,
    /// 5 V.
    V5,
    /// 9 V.
    V9,
    /// 12 V.
    V12,
    /// 15 V.
    V15,
    /// 18 V.
    V18,
    /// 20 V.
    V20,
}

impl VoltageTier {
    /// All tiers that the chip can negotiate, in ascending capability register order.
    pub const ALL: [VoltageTier; 6] = [Self::V5, Self::V9, Self::V12, Self::V15, Self::V18, Self::V20];

    /// The tier's voltage in volts, `0` when unattached.
    pub fn volts(self) -> u8 {
        match self {
            Self::Unattached => 0,
            Self::V5 => 5,
            Self::V9 => 9,
            Self::V12 => 12,
            Self::V15 => 15,
            Self::V18 => 18,
            Self::V20 => 20,
        }
    }

    /// The tier's voltage as a physical quantity.
    pub fn voltage(self) -> ElectricPotential {
        ElectricPotential::new::<volt>(self.volts().into())
    }

    /// The code that selects this tier in the SRC_PDO register.
    pub fn selection(self) -> PdoSelection {
        self.into()
    }
}

impl From<u8> for VoltageTier {
    fn from(value: u8) -> Self {
        match value {
            0b0001 => Self::V5,
            0b0010 => Self::V9,
            0b0011 => Self::V12,
            0b0100 => Self::V15,
            0b0101 => Self::V18,
            0b0110 => Self::V20,
            _ => Self::Unattached,
        }
    }
}

impl From<VoltageTier> for u8 {
    fn from(value: VoltageTier) -> Self {
        match value {
            VoltageTier::Unattached => 0b0000,
            VoltageTier::V5 => 0b0001,
            VoltageTier::V9 => 0b0010,
            VoltageTier::V12 => 0b0011,
            VoltageTier::V15 => 0b0100,
            VoltageTier::V18 => 0b0101,
            VoltageTier::V20 => 0b0110,
        }
    }
}

impl From<PdoSelection> for VoltageTier {
    fn from(value: PdoSelection) -> Self {
        match value {
            PdoSelection::NotSelected => Self::Unattached,
            PdoSelection::V5 => Self::V5,
            PdoSelection::V9 => Self::V9,
            PdoSelection::V12 => Self::V12,
            PdoSelection::V15 => Self::V15,
            PdoSelection::V18 => Self::V18,
            PdoSelection::V20 => Self::V20,
        }
    }
}

/// A profile selection, as written to (and read from) the SRC_PDO register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PdoSelection {
    /// No profile selected, or an unknown code.
    #[default]
    NotSelected,
    /// SRC_PDO_5V
    V5,
    /// SRC_PDO_9V
    V9,
    /// SRC_PDO_12V
    V12,
    /// SRC_PDO_15V
    V15,
    /// SRC_PDO_18V
    V18,
    /// SRC_PDO_20V
    V20,
}

impl PdoSelection {
    /// The voltage tier that this selection requests.
    pub fn tier(self) -> VoltageTier {
        self.into()
    }
}

impl From<u8> for PdoSelection {
    fn from(value: u8) -> Self {
        match value {
            0b0001 => Self::V5,
            0b0010 => Self::V9,
            0b0011 => Self::V12,
            0b1000 => Self::V15,
            0b1001 => Self::V18,
            0b1010 => Self::V20,
            _ => Self::NotSelected,
        }
    }
}

impl From<PdoSelection> for u8 {
    fn from(value: PdoSelection) -> Self {
        match value {
            PdoSelection::NotSelected => 0b0000,
            PdoSelection::V5 => 0b0001,
            PdoSelection::V9 => 0b0010,
            PdoSelection::V12 => 0b0011,
            PdoSelection::V15 => 0b1000,
            PdoSelection::V18 => 0b1001,
            PdoSelection::V20 => 0b1010,
        }
    }
}

impl From<VoltageTier> for PdoSelection {
    fn from(value: VoltageTier) -> Self {
        match value {
            VoltageTier::Unattached => Self::NotSelected,
            VoltageTier::V5 => Self::V5,
            VoltageTier::V9 => Self::V9,
            VoltageTier::V12 => Self::V12,
            VoltageTier::V15 => Self::V15,
            VoltageTier::V18 => Self::V18,
            VoltageTier::V20 => Self::V20,
        }
    }
}

/// Convert a raw tier code to its raw selector code (`0` if undefined).
pub fn voltage_tier_to_selector(tier: u8) -> u8 {
    PdoSelection::from(VoltageTier::from(tier)).into()
}

/// Convert a raw selector code to its raw tier code (`0` if undefined).
pub fn selector_to_voltage_tier(selector: u8) -> u8 {
    VoltageTier::from(PdoSelection::from(selector)).into()
}

/// Response of the source to the last PD command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PdResponse {
    /// No response.
    NoResponse,
    /// Success.
    Success,
    /// Invalid command or argument.
    InvalidCommandOrArgument,
    /// Command not supported.
    CommandNotSupported,
    /// Transaction failed, no GoodCRC was received after sending.
    TransactionFailNoGoodCrc,
    /// A code that the chip does not define. Passed through as-is.
    Reserved(u8),
}

impl From<u8> for PdResponse {
    fn from(value: u8) -> Self {
        match value {
            0b000 => Self::NoResponse,
            0b001 => Self::Success,
            0b011 => Self::InvalidCommandOrArgument,
            0b100 => Self::CommandNotSupported,
            0b101 => Self::TransactionFailNoGoodCrc,
            x => Self::Reserved(x),
        }
    }
}

impl From<PdResponse> for u8 {
    fn from(value: PdResponse) -> Self {
        match value {
            PdResponse::NoResponse => 0b000,
            PdResponse::Success => 0b001,
            PdResponse::InvalidCommandOrArgument => 0b011,
            PdResponse::CommandNotSupported => 0b100,
            PdResponse::TransactionFailNoGoodCrc => 0b101,
            PdResponse::Reserved(x) => x,
        }
    }
}

/// Current of a 5 V contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Contract5VCurrent {
    /// Type-C default current.
    Default,
    /// 1.5 A
    A1_5,
    /// 2.4 A
    A2_4,
    /// 3 A
    A3_0,
}

impl Contract5VCurrent {
    /// The contract current in milliamperes, if it is not the Type-C default.
    pub fn milliamps(self) -> Option<u16> {
        match self {
            Self::Default => None,
            Self::A1_5 => Some(1500),
            Self::A2_4 => Some(2400),
            Self::A3_0 => Some(3000),
        }
    }

    /// The contract current as a physical quantity, if it is not the Type-C default.
    pub fn current(self) -> Option<ElectricCurrent> {
        self.milliamps()
            .map(|milliamps| ElectricCurrent::new::<milliampere>(milliamps.into()))
    }
}

impl From<u8> for Contract5VCurrent {
    fn from(value: u8) -> Self {
        match value & 0b11 {
            0b00 => Self::Default,
            0b01 => Self::A1_5,
            0b10 => Self::A2_4,
            _ => Self::A3_0,
        }
    }
}

/// The configuration channel that carries the PD communication.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CcDirection {
    /// CC1 is connected.
    Cc1,
    /// CC2 is connected.
    Cc2,
}

impl From<bool> for CcDirection {
    fn from(value: bool) -> Self {
        match value {
            false => Self::Cc1,
            true => Self::Cc2,
        }
    }
}

impl From<CcDirection> for bool {
    fn from(direction: CcDirection) -> bool {
        match direction {
            CcDirection::Cc1 => false,
            CcDirection::Cc2 => true,
        }
    }
}
