//! Register map of the HUSB238.
//!
//! All registers are eight bits wide. The bit layouts are expressed with `proc-bitfield`.
use proc_bitfield::bitfield;

use crate::tables::{CcDirection, Contract5VCurrent, CurrentCode, PdResponse, PdoSelection, VoltageTier};

/// Register addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)]
pub enum Register {
    PdStatus0 = 0x00,
    PdStatus1 = 0x01,
    SrcPdo5V = 0x02,
    SrcPdo9V = 0x03,
    SrcPdo12V = 0x04,
    SrcPdo15V = 0x05,
    SrcPdo18V = 0x06,
    SrcPdo20V = 0x07,
    SrcPdo = 0x08,
    GoCommand = 0x09,
}

impl Register {
    /// The capability register that describes a voltage tier.
    ///
    /// Returns `None` for [`VoltageTier::Unattached`].
    pub fn capability(tier: VoltageTier) -> Option<Self> {
        match tier {
            VoltageTier::Unattached => None,
            VoltageTier::V5 => Some(Self::SrcPdo5V),
            VoltageTier::V9 => Some(Self::SrcPdo9V),
            VoltageTier::V12 => Some(Self::SrcPdo12V),
            VoltageTier::V15 => Some(Self::SrcPdo15V),
            VoltageTier::V18 => Some(Self::SrcPdo18V),
            VoltageTier::V20 => Some(Self::SrcPdo20V),
        }
    }
}

impl From<Register> for u8 {
    fn from(register: Register) -> Self {
        register as u8
    }
}

/// A register layout that lives at a fixed address.
pub trait RegisterView: Copy + From<u8> + Into<u8> {
    /// The address of the register.
    const REGISTER: Register;
}

bitfield! {
    /// PD_STATUS0: the voltage and current of the active contract.
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PdStatus0(pub u8): Debug, FromStorage, IntoStorage {
        /// Voltage tier of the active contract.
        pub voltage_tier: u8 [get VoltageTier] @ 4..=7,
        /// Current code of the active contract.
        pub current_code: u8 [get CurrentCode] @ 0..=3,
    }
}

impl RegisterView for PdStatus0 {
    const REGISTER: Register = Register::PdStatus0;
}

bitfield! {
    /// PD_STATUS1: attachment, CC orientation and the result of the last PD command.
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PdStatus1(pub u8): Debug, FromStorage, IntoStorage {
        /// Set when CC2 is connected, cleared for CC1.
        pub cc_direction: bool [get CcDirection] @ 7,
        /// Set while a source is attached.
        pub attached: bool @ 6,
        /// Response to the last PD command.
        pub pd_response: u8 [get PdResponse] @ 3..=5,
        /// Set while a 5 V contract is active.
        pub contract_5v_active: bool @ 2,
        /// Current of the 5 V contract.
        pub contract_5v_current: u8 [get Contract5VCurrent] @ 0..=1,
    }
}

impl RegisterView for PdStatus1 {
    const REGISTER: Register = Register::PdStatus1;
}

bitfield! {
    /// SRC_PDO_xV: the source's offer for one voltage tier.
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SrcPdo(pub u8): Debug, FromStorage, IntoStorage {
        /// Set when the source offers this tier.
        pub detected: bool @ 7,
        /// Maximum current that the source offers for this tier.
        pub current_code: u8 [get CurrentCode] @ 0..=3,
    }
}

bitfield! {
    /// SRC_PDO: the profile that the next request negotiates.
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct PdoSelect(pub u8): Debug, FromStorage, IntoStorage {
        /// Selected profile, in selector encoding.
        pub selection: u8 [get PdoSelection, set PdoSelection] @ 4..=7,
    }
}

impl RegisterView for PdoSelect {
    const REGISTER: Register = Register::SrcPdo;
}

/// Commands that the GO_COMMAND register accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Request the profile that is selected in SRC_PDO.
    RequestPdo = 0b0_0001,
    /// Ask the source for its capabilities again.
    GetSourceCapabilities = 0b0_0100,
    /// Send a hard reset.
    HardReset = 0b1_0000,
}

impl From<Command> for u8 {
    fn from(command: Command) -> Self {
        command as u8
    }
}

bitfield! {
    /// GO_COMMAND: triggers a PD command.
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct GoCommand(pub u8): Debug, FromStorage, IntoStorage {
        /// Raw command code.
        pub raw_command: u8 @ 0..=4,
    }
}

impl GoCommand {
    /// Create the register value for a command.
    pub fn new(command: Command) -> Self {
        Self(0).with_raw_command(command.into())
    }
}

impl RegisterView for GoCommand {
    const REGISTER: Register = Register::GoCommand;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status1_fields() {
        // CC2, attached, success, 5 V contract at 3 A
        let status = PdStatus1(0b1100_1111);

        assert_eq!(status.cc_direction(), CcDirection::Cc2);
        assert!(status.attached());
        assert_eq!(status.pd_response(), PdResponse::Success);
        assert!(status.contract_5v_active());
        assert_eq!(status.contract_5v_current(), Contract5VCurrent::A3_0);
    }

    #[test]
    fn test_status1_zero_is_inactive() {
        let status = PdStatus1(0);

        assert_eq!(status.cc_direction(), CcDirection::Cc1);
        assert!(!status.attached());
        assert_eq!(status.pd_response(), PdResponse::NoResponse);
        assert!(!status.contract_5v_active());
        assert_eq!(status.contract_5v_current(), Contract5VCurrent::Default);
    }

    #[test]
    fn test_status0_fields() {
        // 20 V at 2.25 A
        let status = PdStatus0(0x67);

        assert_eq!(status.voltage_tier(), VoltageTier::V20);
        assert_eq!(status.current_code(), CurrentCode::A2_25);
    }

    #[test]
    fn test_capability_register() {
        let supported = SrcPdo(0b1000_1010);
        assert!(supported.detected());
        assert_eq!(supported.current_code(), CurrentCode::A3_0);

        // Current bits without the detected flag.
        assert!(!SrcPdo(0b0000_1111).detected());
    }

    #[test]
    fn test_pdo_select_uses_selector_space() {
        assert_eq!(PdoSelect(0).with_selection(PdoSelection::V15).0, 0x80);
        assert_eq!(PdoSelect(0xA0).selection(), PdoSelection::V20);
    }

    #[test]
    fn test_capability_addresses() {
        let addresses: [u8; 6] = [0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        for (tier, address) in VoltageTier::ALL.into_iter().zip(addresses) {
            assert_eq!(Register::capability(tier).map(u8::from), Some(address));
        }

        assert_eq!(Register::capability(VoltageTier::Unattached), None);
    }

    #[test]
    fn test_go_command_values() {
        assert_eq!(u8::from(GoCommand::new(Command::RequestPdo)), 0b0_0001);
        assert_eq!(u8::from(GoCommand::new(Command::GetSourceCapabilities)), 0b0_0100);
        assert_eq!(u8::from(GoCommand::new(Command::HardReset)), 0b1_0000);
    }
}
