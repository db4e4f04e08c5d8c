use serde::{Deserialize, Serialize};

/// Reader setup values and the iteration budgets of the two polling loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ComIrqReg reads before a command is given up on.
    pub command_poll_budget: u32,
    /// DivIrqReg reads before the CRC result is taken as-is.
    pub crc_poll_budget: u32,
    /// TAuto=1; timer starts automatically at the end of the transmission.
    pub timer_mode: u8,
    /// 0x0A9 = 169 => f_timer = 40kHz, a timer period of 25us.
    pub timer_prescaler: u8,
    /// 0x3E8 = 1000 ticks, 25ms before the chip's own timeout fires.
    pub timer_reload: u16,
    /// Force a 100 % ASK modulation.
    pub tx_ask: u8,
    /// CRC coprocessor preset 0x6363 (ISO 14443-3 part 6.2.4).
    pub mode: u8,
    /// Delay after a soft reset before the chip is configured.
    pub reset_settle_ms: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_poll_budget: 20_000,
            crc_poll_budget: 0xFF,
            timer_mode: 0x80,
            timer_prescaler: 0xA9,
            timer_reload: 0x03E8,
            tx_ask: 0x40,
            mode: 0x3D,
            reset_settle_ms: 50,
        }
    }
}
