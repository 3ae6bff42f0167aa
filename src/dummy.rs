//! Implements a simulated HUSB238 on a dummy I2C bus for testing.
use std::vec::Vec;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::ADDRESS;
use crate::registers::{Command, PdStatus0, PdStatus1, PdoSelect, Register, SrcPdo};
use crate::tables::{CurrentCode, PdResponse, VoltageTier};

const REGISTER_COUNT: usize = 10;

/// A simulated chip with a register file.
///
/// Records every register write, and can be told to fail reads of individual registers.
#[derive(Debug, Default)]
pub struct DummyChip {
    registers: [u8; REGISTER_COUNT],
    pointer: u8,
    failing: Vec<u8>,
    writes: Vec<(u8, u8)>,
}

impl DummyChip {
    /// Create a chip without an attached source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chip with an attached source that completed the PD handshake.
    ///
    /// The source offers the given tiers, and 5 V is the active contract.
    pub fn attached(offers: &[(VoltageTier, CurrentCode)]) -> Self {
        let mut chip = Self::new();
        chip.set_status1(
            PdStatus1(0)
                .with_attached(true)
                .with_pd_response(PdResponse::Success.into()),
        );
        chip.set_status0(
            PdStatus0(0)
                .with_voltage_tier(VoltageTier::V5.into())
                .with_current_code(CurrentCode::A3_0.into()),
        );

        for (tier, current_code) in offers {
            chip.offer(*tier, *current_code);
        }

        chip
    }

    /// Set the PD_STATUS0 register.
    pub fn set_status0(&mut self, status: PdStatus0) {
        self.registers[Register::PdStatus0 as usize] = status.into();
    }

    /// Set the PD_STATUS1 register.
    pub fn set_status1(&mut self, status: PdStatus1) {
        self.registers[Register::PdStatus1 as usize] = status.into();
    }

    /// Set a raw register value.
    pub fn set_register(&mut self, register: Register, value: u8) {
        self.registers[register as usize] = value;
    }

    /// Let the source offer a tier.
    pub fn offer(&mut self, tier: VoltageTier, current_code: CurrentCode) {
        if let Some(register) = Register::capability(tier) {
            self.registers[register as usize] = SrcPdo(0)
                .with_detected(true)
                .with_current_code(current_code.into())
                .into();
        }
    }

    /// Let every access to a register fail.
    pub fn fail_register(&mut self, register: Register) {
        self.failing.push(register.into());
    }

    /// Probe the register writes that were made, in order.
    pub fn probe_writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    fn check(&self, register: u8) -> Result<(), ErrorKind> {
        if register as usize >= REGISTER_COUNT {
            Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data))
        } else if self.failing.contains(&register) {
            Err(ErrorKind::Other)
        } else {
            Ok(())
        }
    }

    fn store(&mut self, register: u8, value: u8) {
        self.writes.push((register, value));
        self.registers[register as usize] = value;

        if register == u8::from(Register::GoCommand) {
            self.execute(value);
        }
    }

    /// React to a command like a cooperative source would.
    fn execute(&mut self, command: u8) {
        let response = if command == u8::from(Command::RequestPdo) {
            let tier = PdoSelect(self.registers[Register::SrcPdo as usize]).selection().tier();
            let offer = Register::capability(tier).map(|register| SrcPdo(self.registers[register as usize]));

            match offer {
                Some(offer) if offer.detected() => {
                    self.set_status0(
                        PdStatus0(0)
                            .with_voltage_tier(tier.into())
                            .with_current_code(offer.current_code().into()),
                    );
                    PdResponse::Success
                }
                _ => PdResponse::InvalidCommandOrArgument,
            }
        } else if command == u8::from(Command::HardReset) {
            self.set_status0(PdStatus0(0));
            PdResponse::NoResponse
        } else {
            PdResponse::Success
        };

        let status = PdStatus1(self.registers[Register::PdStatus1 as usize]).with_pd_response(response.into());
        self.set_status1(status);
    }
}

impl ErrorType for DummyChip {
    type Error = ErrorKind;
}

impl I2c for DummyChip {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        if address != ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let Some((&register, data)) = bytes.split_first() else {
                        continue;
                    };
                    self.check(register)?;
                    self.pointer = register;

                    for (offset, value) in data.iter().enumerate() {
                        let target = register + offset as u8;
                        self.check(target)?;
                        self.store(target, *value);
                    }
                }
                Operation::Read(buffer) => {
                    for (offset, byte) in buffer.iter_mut().enumerate() {
                        let source = self.pointer + offset as u8;
                        self.check(source)?;
                        *byte = self.registers[source as usize];
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal::i2c::I2c;

    use super::DummyChip;
    use crate::registers::Register;

    #[test]
    fn test_register_file() {
        let mut chip = DummyChip::new();
        chip.set_register(Register::SrcPdo9V, 0x8A);

        let mut buf = [0u8; 1];
        chip.write_read(crate::ADDRESS, &[0x03], &mut buf).unwrap();
        assert_eq!(buf[0], 0x8A);

        chip.write(crate::ADDRESS, &[0x08, 0x20]).unwrap();
        assert_eq!(chip.probe_writes(), &[(0x08, 0x20)]);
    }

    #[test]
    fn test_failures() {
        let mut chip = DummyChip::new();
        chip.fail_register(Register::PdStatus1);

        let mut buf = [0u8; 1];
        assert!(chip.write_read(crate::ADDRESS, &[0x01], &mut buf).is_err());
        assert!(chip.write_read(crate::ADDRESS, &[0x00], &mut buf).is_ok());

        // Wrong device address.
        assert!(chip.write_read(0x09, &[0x00], &mut buf).is_err());
    }
}
