use crate::com::Com;
use crate::config::Config;
use crate::error::Error;
use crate::poll;
use crate::register::*;
use alloc::vec::Vec;
use embedded_hal::blocking::delay::DelayMs;

pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Chip-level completion state of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// The chip's timer fired while it waited for an answer.
    NoTag,
    /// Error flags set or poll budget exhausted.
    Error,
}

/// What came back from one `execute` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub status: Status,
    pub data: Vec<u8>,
    /// Valid bits in `data`; the last byte may be partial.
    pub bits: usize,
    /// ErrorReg bits that failed the command, 0 otherwise.
    pub error_flags: u8,
}

impl CommandOutcome {
    fn error() -> Self {
        Self {
            status: Status::Error,
            data: Vec::new(),
            bits: 0,
            error_flags: 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

pub struct Mfrc522<C> {
    com: C,
    config: Config,
}

impl<C: Com> Mfrc522<C> {
    pub fn new(com: C, config: Config) -> Self {
        Self { com, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn release(self) -> C {
        self.com
    }

    pub fn read_register(&mut self, reg: Register) -> Result<u8, C::Error> {
        let mut value = [0u8; 1];
        self.com.read(reg.into(), &mut value).map_err(Error::Com)?;
        Ok(value[0])
    }

    pub fn write_register(&mut self, reg: Register, value: u8) -> Result<(), C::Error> {
        self.com.write(reg.into(), &[value]).map_err(Error::Com)
    }

    /// Multi-byte write in one bus transfer, used to load the FIFO.
    pub fn write_multiple(&mut self, reg: Register, value: &[u8]) -> Result<(), C::Error> {
        if value.is_empty() {
            return Ok(());
        }
        self.com.write(reg.into(), value).map_err(Error::Com)
    }

    pub fn set_register_bitmask(&mut self, reg: Register, mask: u8) -> Result<(), C::Error> {
        let tmp = self.read_register(reg)?;
        self.write_register(reg, tmp | mask)
    }

    pub fn clear_register_bitmask(&mut self, reg: Register, mask: u8) -> Result<(), C::Error> {
        let tmp = self.read_register(reg)?;
        self.write_register(reg, tmp & !mask)
    }

    /// Soft reset followed by timer, modulation and CRC preset setup, then antenna on.
    pub fn init<D: DelayMs<u16>>(&mut self, delay: &mut D) -> Result<(), C::Error> {
        self.reset()?;
        delay.delay_ms(self.config.reset_settle_ms);

        let [reload_high, reload_low] = self.config.timer_reload.to_be_bytes();
        self.write_register(Register::TModeReg, self.config.timer_mode)?;
        self.write_register(Register::TPrescalerReg, self.config.timer_prescaler)?;
        self.write_register(Register::TReloadRegHigh, reload_high)?;
        self.write_register(Register::TReloadRegLow, reload_low)?;
        self.write_register(Register::TxASKReg, self.config.tx_ask)?;
        self.write_register(Register::ModeReg, self.config.mode)?;
        // IRQ pin as CMOS output
        self.write_register(Register::DivIEnReg, 0x80)?;
        // propagate RxIRq to the IRQ pin
        self.write_register(Register::ComIEnReg, 0x20)?;
        self.antenna_on()?;
        log::debug!("reader initialised");
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), C::Error> {
        self.write_register(Register::CommandReg, Command::SoftReset.into())
    }

    pub fn version(&mut self) -> Result<u8, C::Error> {
        self.read_register(Register::VersionReg)
    }

    /// Logs every configuration and status register at debug level.
    /// FIFODataReg is skipped since reading it consumes a byte.
    pub fn dump_registers(&mut self) -> Result<(), C::Error> {
        for &reg in [
            Register::CommandReg,
            Register::ComIEnReg,
            Register::DivIEnReg,
            Register::ComIrqReg,
            Register::DivIrqReg,
            Register::ErrorReg,
            Register::Status1Reg,
            Register::Status2Reg,
            Register::FIFOLevelReg,
            Register::ControlReg,
            Register::BitFramingReg,
            Register::ModeReg,
            Register::TxControlReg,
            Register::TxASKReg,
            Register::CRCResultRegHigh,
            Register::CRCResultRegLow,
            Register::TModeReg,
            Register::TPrescalerReg,
            Register::TReloadRegHigh,
            Register::TReloadRegLow,
            Register::AutoTestReg,
            Register::VersionReg,
        ]
        .iter()
        {
            let value = self.read_register(reg)?;
            log::debug!("{:?}: {:02x?}", reg, value);
        }
        Ok(())
    }

    /// Turns TX1 and TX2 on unless both already drive the carrier.
    pub fn antenna_on(&mut self) -> Result<(), C::Error> {
        let control_reg = self.read_register(Register::TxControlReg)?;
        if control_reg & ANTENNA_BITS != ANTENNA_BITS {
            self.write_register(Register::TxControlReg, control_reg | ANTENNA_BITS)?;
        }
        Ok(())
    }

    /// Turns TX1 and TX2 off if either of them is on.
    pub fn antenna_off(&mut self) -> Result<(), C::Error> {
        let control_reg = self.read_register(Register::TxControlReg)?;
        if control_reg & ANTENNA_BITS != 0 {
            self.write_register(Register::TxControlReg, control_reg & !ANTENNA_BITS)?;
        }
        Ok(())
    }

    /// Runs `command` on the chip with `send_data` loaded into the FIFO.
    ///
    /// Only bus faults are returned as `Err`; timeouts, error flags and a
    /// silent field are reported through `CommandOutcome::status`.
    pub fn execute(&mut self, command: Command, send_data: &[u8]) -> Result<CommandOutcome, C::Error> {
        let (irq_en, wait_irq) = command.irq_masks();
        let transceive = command == Command::Transceive;

        self.write_register(Register::CommandReg, Command::Idle.into())?; // Stop any active command.
        self.write_register(Register::ComIrqReg, ALL_IRQ)?; // Clear all seven interrupt request bits.
        self.set_register_bitmask(Register::FIFOLevelReg, FLUSH_BUFFER)?;
        self.write_multiple(Register::FIFODataReg, send_data)?;
        if transceive {
            self.clear_register_bitmask(Register::BitFramingReg, START_SEND)?;
        }
        self.write_register(Register::CommandReg, command.into())?;
        if transceive {
            self.set_register_bitmask(Register::BitFramingReg, START_SEND)?;
        }
        log::trace!("{:?} started with {:02x?}", command, send_data);

        let budget = self.config.command_poll_budget;
        let com = &mut self.com;
        let irq = poll::bounded(
            budget,
            || {
                let mut value = [0u8; 1];
                com.read(Register::ComIrqReg.into(), &mut value).map(|_| value[0])
            },
            |&n| n & (wait_irq | TIMER_IRQ) != 0,
        )
        .map_err(Error::Com)?;

        self.clear_register_bitmask(Register::BitFramingReg, START_SEND)?;

        let irq = match irq {
            Some(irq) => irq,
            None => {
                log::warn!("{:?} gave no completion within {} polls", command, budget);
                return Ok(CommandOutcome::error());
            }
        };

        let error_reg = self.read_register(Register::ErrorReg)?;
        if error_reg & ERROR_MASK != 0 {
            log::debug!("{:?} failed, ErrorReg {:#04x}", command, error_reg);
            return Ok(CommandOutcome {
                error_flags: error_reg & ERROR_MASK,
                ..CommandOutcome::error()
            });
        }

        if irq & irq_en & TIMER_IRQ != 0 {
            return Ok(CommandOutcome {
                status: Status::NoTag,
                ..CommandOutcome::error()
            });
        }

        let mut outcome = CommandOutcome {
            status: Status::Ok,
            ..CommandOutcome::error()
        };
        if transceive {
            let level = (self.read_register(Register::FIFOLevelReg)? & FIFO_LEVEL_MASK) as usize;
            let last_bits = (self.read_register(Register::ControlReg)? & RX_LAST_BITS_MASK) as usize;
            let bits = match (level, last_bits) {
                (0, _) => 0,
                (n, 0) => n * 8,
                (n, l) => (n - 1) * 8 + l,
            };
            let count = level.clamp(1, FIFO_DRAIN_LIMIT);
            outcome.data.reserve(count);
            for _ in 0..count {
                let byte = self.read_register(Register::FIFODataReg)?;
                outcome.data.push(byte);
            }
            outcome.bits = bits.min(count * 8);
            log::trace!("{:?} received {:02x?} ({} bits)", command, outcome.data, outcome.bits);
        }
        Ok(outcome)
    }

    /// CRC_A of `data` from the chip's coprocessor, `[low, high]`.
    ///
    /// When CRCIRq is not seen within the budget the result registers are
    /// returned as they are.
    pub fn calculate_crc(&mut self, data: &[u8]) -> Result<[u8; 2], C::Error> {
        if !self.run_crc(data)? {
            log::warn!("CRC coprocessor not done after {} polls", self.config.crc_poll_budget);
        }
        self.read_crc_result()
    }

    /// Like `calculate_crc` but fails with `Error::Crc` on timeout.
    pub fn try_calculate_crc(&mut self, data: &[u8]) -> Result<[u8; 2], C::Error> {
        if !self.run_crc(data)? {
            return Err(Error::Crc);
        }
        self.read_crc_result()
    }

    fn run_crc(&mut self, data: &[u8]) -> Result<bool, C::Error> {
        self.write_register(Register::CommandReg, Command::Idle.into())?;
        self.write_register(Register::DivIrqReg, CRC_IRQ)?;
        self.set_register_bitmask(Register::FIFOLevelReg, FLUSH_BUFFER)?;
        for &byte in data {
            self.write_register(Register::FIFODataReg, byte)?;
        }
        self.write_register(Register::CommandReg, Command::CalcCRC.into())?;

        let com = &mut self.com;
        let done = poll::bounded(
            self.config.crc_poll_budget,
            || {
                let mut value = [0u8; 1];
                com.read(Register::DivIrqReg.into(), &mut value).map(|_| value[0])
            },
            |&n| n & CRC_IRQ != 0,
        )
        .map_err(Error::Com)?;

        self.write_register(Register::CommandReg, Command::Idle.into())?;
        Ok(done.is_some())
    }

    fn read_crc_result(&mut self) -> Result<[u8; 2], C::Error> {
        let res_low = self.read_register(Register::CRCResultRegLow)?;
        let res_high = self.read_register(Register::CRCResultRegHigh)?;
        Ok([res_low, res_high])
    }
}
