//! The HUSB238 driver.
//!
//! Every method performs blocking I2C transactions and returns once the bus is done.
//! The chip handles one transaction at a time, so the driver borrows itself mutably for each.
//!
//! Status methods such as [`Husb238::is_attached`] never fail. If the underlying register
//! cannot be read, they decode an all-zero register instead, which reads as "unattached",
//! "no response" and "not offered". Use the `read_*` methods to see bus errors.
use embedded_hal::i2c::I2c;

use crate::error::Error;
use crate::policy::ProfilePolicy;
use crate::profile::{Profile, ProfileSet};
use crate::registers::{Command, GoCommand, PdStatus0, PdStatus1, PdoSelect, Register, RegisterView, SrcPdo};
use crate::tables::{CcDirection, Contract5VCurrent, CurrentCode, PdResponse, PdoSelection, VoltageTier};
use crate::units::{ElectricCurrent, ElectricPotential};


/// The fixed 7-bit I2C address of the HUSB238.
pub const ADDRESS: u8 = 0x08;

/// Result of [`Husb238::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitOutcome {
    /// No source is attached.
    NotAttached,
    /// A source is attached, but the PD handshake did not succeed.
    HandshakeFailed(PdResponse),
    /// The handshake succeeded, but the source offers no profile.
    NoProfiles,
    /// Ready, with the number of offered profiles.
    Ready(usize),
}

impl InitOutcome {
    /// The outcome as a status code.
    ///
    /// - `0`: not attached
    /// - `-1`: handshake failed
    /// - `-2`: no profiles
    /// - positive: the number of offered profiles, saturating at `i8::MAX`
    pub fn code(&self) -> i8 {
        match self {
            Self::NotAttached => 0,
            Self::HandshakeFailed(_) => -1,
            Self::NoProfiles => -2,
            Self::Ready(count) => i8::try_from(*count).unwrap_or(i8::MAX),
        }
    }

    /// Determine, whether the chip is ready for profile selection.
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl From<InitOutcome> for i8 {
    fn from(outcome: InitOutcome) -> Self {
        outcome.code()
    }
}

/// Driver for the HUSB238 USB-PD sink controller.
///
/// Owns the I2C bus. To share a bus between drivers or threads, hand in a shared bus
/// implementation (for example from `embedded-hal-bus`) that serializes access.
#[derive(Debug)]
pub struct Husb238<I2C> {
    i2c: I2C,
    profiles: ProfileSet,
}

impl<I2C> Husb238<I2C> {
    /// Create a new driver on the given bus.
    ///
    /// No bus traffic happens until the first operation.
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            profiles: ProfileSet::new(),
        }
    }

    /// Destroy the driver and return the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// The profiles found by the last scan.
    ///
    /// Empty until [`Husb238::scan_supported_profiles`] ran.
    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    /// Determine, whether a voltage tier was offered during the last scan.
    ///
    /// Does not talk to the chip.
    pub fn is_voltage_detected(&self, tier: VoltageTier) -> bool {
        self.profiles.contains(tier)
    }
}

impl<I2C: I2c> Husb238<I2C> {
    /// Write a single register.
    pub fn write_register(&mut self, register: Register, value: u8) -> Result<(), Error<I2C::Error>> {
        trace!("Write {:?} = {:#x}", register, value);
        self.i2c.write(ADDRESS, &[u8::from(register), value]).map_err(Error::Bus)
    }

    /// Read a single register.
    ///
    /// The address is written without a stop condition, followed by a one-byte read.
    pub fn read_register(&mut self, register: Register) -> Result<u8, Error<I2C::Error>> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(ADDRESS, &[u8::from(register)], &mut buffer)
            .map_err(Error::Bus)?;

        trace!("Read {:?} = {:#x}", register, buffer[0]);
        Ok(buffer[0])
    }

    fn read<R: RegisterView>(&mut self) -> Result<R, Error<I2C::Error>> {
        self.read_register(R::REGISTER).map(R::from)
    }

    fn write<R: RegisterView>(&mut self, value: R) -> Result<(), Error<I2C::Error>> {
        self.write_register(R::REGISTER, value.into())
    }

    /// Read a register, decoding a failed read as the all-zero register.
    fn read_or_zero<R: RegisterView>(&mut self) -> R {
        self.read().unwrap_or_else(|_| {
            warn!("Reading {:?} failed, assuming zero", R::REGISTER);
            R::from(0)
        })
    }

    /// Read the PD_STATUS0 register.
    pub fn read_status0(&mut self) -> Result<PdStatus0, Error<I2C::Error>> {
        self.read()
    }

    /// Read the PD_STATUS1 register.
    pub fn read_status1(&mut self) -> Result<PdStatus1, Error<I2C::Error>> {
        self.read()
    }

    /// Read the SRC_PDO (selection) register.
    pub fn read_pdo_select(&mut self) -> Result<PdoSelect, Error<I2C::Error>> {
        self.read()
    }

    /// Read the capability register of a voltage tier.
    ///
    /// [`VoltageTier::Unattached`] has no register and is never offered.
    pub fn read_capability(&mut self, tier: VoltageTier) -> Result<SrcPdo, Error<I2C::Error>> {
        match Register::capability(tier) {
            Some(register) => self.read_register(register).map(SrcPdo::from),
            None => Ok(SrcPdo(0)),
        }
    }

    /// The configuration channel in use.
    pub fn cc_direction(&mut self) -> CcDirection {
        self.read_or_zero::<PdStatus1>().cc_direction()
    }

    /// Determine, whether a source is attached.
    pub fn is_attached(&mut self) -> bool {
        self.read_or_zero::<PdStatus1>().attached()
    }

    /// The response to the last PD command.
    pub fn pd_response(&mut self) -> PdResponse {
        self.read_or_zero::<PdStatus1>().pd_response()
    }

    /// Determine, whether a 5 V contract is active.
    pub fn contract_5v_active(&mut self) -> bool {
        self.read_or_zero::<PdStatus1>().contract_5v_active()
    }

    /// The current of the 5 V contract.
    pub fn contract_5v_current(&mut self) -> Contract5VCurrent {
        self.read_or_zero::<PdStatus1>().contract_5v_current()
    }

    /// The voltage tier of the active contract.
    pub fn active_voltage_tier(&mut self) -> VoltageTier {
        self.read_or_zero::<PdStatus0>().voltage_tier()
    }

    /// The voltage of the active contract (zero when unattached).
    pub fn active_voltage(&mut self) -> ElectricPotential {
        self.active_voltage_tier().voltage()
    }

    /// The current code of the active contract.
    pub fn active_current_code(&mut self) -> CurrentCode {
        self.read_or_zero::<PdStatus0>().current_code()
    }

    /// The current of the active contract.
    pub fn active_current(&mut self) -> ElectricCurrent {
        self.active_current_code().current()
    }

    /// The profile selection in the SRC_PDO register.
    pub fn selected_profile(&mut self) -> PdoSelection {
        self.read_or_zero::<PdoSelect>().selection()
    }

    /// The voltage tier that the SRC_PDO register selects.
    ///
    /// The raw SRC_PDO nibble is a selector code, not a scan tier index. It is decoded
    /// via [`PdoSelection`], so 15 V, 18 V and 20 V (selectors 8, 9, 10) map to their tiers.
    pub fn selected_profile_tier(&mut self) -> VoltageTier {
        self.selected_profile().tier()
    }

    /// Scan the capability registers and rebuild the set of offered profiles.
    ///
    /// Registers are read in ascending order (5 V to 20 V). A register that cannot be
    /// read counts as "not offered", and the scan continues with the next one.
    pub fn scan_supported_profiles(&mut self) -> &ProfileSet {
        self.profiles.clear();

        for tier in VoltageTier::ALL {
            let capability = match self.read_capability(tier) {
                Ok(capability) => capability,
                Err(_) => {
                    warn!("Reading capability of {:?} failed, assuming not offered", tier);
                    continue;
                }
            };

            if !capability.detected() {
                continue;
            }

            let profile = Profile::new(tier, capability.current_code());
            debug!(
                "Source offers {:?} V at {:?} mA",
                profile.raw_voltage(),
                profile.raw_current()
            );

            if self.profiles.push(profile).is_err() {
                error!("Profile set is full, dropping {:?}", tier);
                break;
            }
        }

        &self.profiles
    }

    /// Select the profile that the next request negotiates.
    ///
    /// Accepts a [`PdoSelection`] or a [`VoltageTier`], which is converted to its selector code.
    /// The register is not read back.
    pub fn select_profile(&mut self, selection: impl Into<PdoSelection>) -> Result<(), Error<I2C::Error>> {
        let selection = selection.into();
        debug!("Select {:?}", selection);
        self.write(PdoSelect(0).with_selection(selection))
    }

    /// Request the selected profile from the source.
    ///
    /// Completion is not awaited. Poll [`Husb238::pd_response`] afterwards.
    pub fn request_negotiation(&mut self) -> Result<(), Error<I2C::Error>> {
        self.command(Command::RequestPdo)
    }

    /// Ask the source to send its capabilities again, refreshing the capability registers.
    pub fn request_source_capabilities(&mut self) -> Result<(), Error<I2C::Error>> {
        self.command(Command::GetSourceCapabilities)
    }

    /// Send a hard reset, which restarts the negotiation from scratch.
    pub fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        self.command(Command::HardReset)
    }

    fn command(&mut self, command: Command) -> Result<(), Error<I2C::Error>> {
        debug!("Command {:?}", command);
        self.write(GoCommand::new(command))
    }

    /// Check attachment and the PD handshake, then scan the offered profiles.
    ///
    /// The checks run once, in order, and stop at the first failure.
    pub fn initialize(&mut self) -> InitOutcome {
        if !self.is_attached() {
            info!("No source attached");
            return InitOutcome::NotAttached;
        }

        let response = self.pd_response();
        if response != PdResponse::Success {
            warn!("PD handshake failed with {:?}", response);
            return InitOutcome::HandshakeFailed(response);
        }

        let count = self.scan_supported_profiles().len();
        if count == 0 {
            warn!("Source offers no profiles");
            return InitOutcome::NoProfiles;
        }

        info!("Source offers {:?} profiles", count);
        InitOutcome::Ready(count)
    }

    /// Select a tier and trigger negotiation.
    ///
    /// Only tiers found by the last scan are accepted.
    pub fn request_profile(&mut self, tier: VoltageTier) -> Result<(), Error<I2C::Error>> {
        if !self.is_voltage_detected(tier) {
            return Err(Error::ProfileNotOffered(tier));
        }

        self.select_profile(tier)?;
        self.request_negotiation()
    }

    /// Scan the offered profiles, let the policy choose, and request its choice.
    ///
    /// Returns the requested profile, or `None` if the policy did not choose any.
    pub fn negotiate<P: ProfilePolicy>(&mut self, policy: &mut P) -> Result<Option<Profile>, Error<I2C::Error>> {
        self.scan_supported_profiles();

        let Some(tier) = policy.choose(&self.profiles) else {
            debug!("Policy chose no profile");
            return Ok(None);
        };

        self.request_profile(tier)?;
        Ok(self.profiles.get(tier).copied())
    }
}
