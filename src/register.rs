#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    // Reserved         = 0x00,
    CommandReg = 0x01,
    ComIEnReg = 0x02,
    DivIEnReg = 0x03,
    ComIrqReg = 0x04,
    DivIrqReg = 0x05,
    ErrorReg = 0x06,
    Status1Reg = 0x07,
    Status2Reg = 0x08,
    FIFODataReg = 0x09,
    FIFOLevelReg = 0x0A,
    ControlReg = 0x0C,
    BitFramingReg = 0x0D,
    ModeReg = 0x11,
    TxControlReg = 0x14,
    TxASKReg = 0x15,
    CRCResultRegHigh = 0x21,
    CRCResultRegLow = 0x22,
    TModeReg = 0x2A,
    TPrescalerReg = 0x2B,
    TReloadRegHigh = 0x2C,
    TReloadRegLow = 0x2D,
    AutoTestReg = 0x36,
    VersionReg = 0x37,
}

impl From<Register> for u8 {
    #[inline(always)]
    fn from(variant: Register) -> Self {
        variant as _
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    Idle = 0b0000,
    CalcCRC = 0b0011,
    Transceive = 0b1100,
    MfAuthent = 0b1110,
    SoftReset = 0b1111,
}

impl From<Command> for u8 {
    #[inline(always)]
    fn from(variant: Command) -> Self {
        variant as _
    }
}

impl Command {
    /// ComIEnReg mask and the ComIrqReg bits that mark completion.
    /// Commands that are not waited on report `(0, 0)`.
    pub fn irq_masks(self) -> (u8, u8) {
        match self {
            Command::MfAuthent => (0x12, IDLE_IRQ),
            Command::Transceive => (0x77, RX_IRQ | IDLE_IRQ),
            _ => (0x00, 0x00),
        }
    }
}

// ComIrqReg
pub const TIMER_IRQ: u8 = 1 << 0;
pub const IDLE_IRQ: u8 = 1 << 4;
pub const RX_IRQ: u8 = 1 << 5;
/// Writing this set with Set1 = 0 clears every request bit.
pub const ALL_IRQ: u8 = 0x7F;

// DivIrqReg
pub const CRC_IRQ: u8 = 1 << 2;

// ErrorReg: BufferOvfl CollErr ParityErr ProtocolErr
pub const ERROR_MASK: u8 = 0x1B;

// FIFOLevelReg
pub const FLUSH_BUFFER: u8 = 1 << 7;
pub const FIFO_LEVEL_MASK: u8 = 0x7F;

// ControlReg
pub const RX_LAST_BITS_MASK: u8 = 0x07;

// BitFramingReg
pub const START_SEND: u8 = 1 << 7;

// TxControlReg: Tx2RFEn Tx1RFEn
pub const ANTENNA_BITS: u8 = 0x03;

/// Bytes the reply path drains from the FIFO at most.
pub const FIFO_DRAIN_LIMIT: usize = 16;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_match_datasheet() {
        assert_eq!(u8::from(Register::CommandReg), 0x01);
        assert_eq!(u8::from(Register::FIFODataReg), 0x09);
        assert_eq!(u8::from(Register::BitFramingReg), 0x0D);
        assert_eq!(u8::from(Register::CRCResultRegHigh), 0x21);
        assert_eq!(u8::from(Register::CRCResultRegLow), 0x22);
        assert_eq!(u8::from(Register::VersionReg), 0x37);
    }

    #[test]
    fn wait_bits_per_command() {
        assert_eq!(Command::Transceive.irq_masks(), (0x77, 0x30));
        assert_eq!(Command::MfAuthent.irq_masks(), (0x12, 0x10));
        assert_eq!(Command::CalcCRC.irq_masks(), (0x00, 0x00));
        assert_eq!(u8::from(Command::Transceive), 0x0C);
    }
}
