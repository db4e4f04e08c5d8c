//! Register-level stand-in for the reader chip and a card in its field.

use crate::com::Com;
use crate::register::*;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeBusError;

/// How the card answers one transmitted frame.
#[derive(Debug, Clone)]
pub struct Reply {
    irq: u8,
    error: u8,
    data: Vec<u8>,
    last_bits: u8,
}

impl Reply {
    pub fn data(data: &[u8]) -> Self {
        Self {
            irq: RX_IRQ | IDLE_IRQ,
            error: 0,
            data: data.to_vec(),
            last_bits: 0,
        }
    }

    pub fn atqa() -> Self {
        Self::data(&[0x04, 0x00])
    }

    /// Anticollision answer: four UID bytes and their BCC.
    pub fn fragment(uid: [u8; 4]) -> Self {
        let bcc = uid.iter().fold(0u8, |acc, b| acc ^ b);
        Self::data(&[uid[0], uid[1], uid[2], uid[3], bcc])
    }

    /// Select acknowledge: SAK followed by its CRC_A.
    pub fn sak(sak: u8) -> Self {
        let crc = crc_a(&[sak]);
        Self::data(&[sak, crc[0], crc[1]])
    }

    /// The chip timer fires, nobody answers.
    pub fn no_tag() -> Self {
        Self {
            irq: TIMER_IRQ,
            error: 0,
            data: Vec::new(),
            last_bits: 0,
        }
    }

    /// No interrupt bit is ever raised.
    pub fn silent() -> Self {
        Self {
            irq: 0,
            ..Self::no_tag()
        }
    }

    pub fn with_last_bits(mut self, bits: u8) -> Self {
        self.last_bits = bits;
        self
    }

    pub fn with_error(mut self, error: u8) -> Self {
        self.error = error;
        self
    }
}

pub struct FakeChip {
    registers: [u8; 0x40],
    writes: [usize; 0x40],
    fifo_in: Vec<u8>,
    fifo_out: VecDeque<u8>,
    replies: VecDeque<Reply>,
    sent: Vec<Vec<u8>>,
    tx_last_bits: Vec<u8>,
    irq_polls: usize,
    resets: usize,
    stall_crc: bool,
    ops: usize,
    fail_after: Option<usize>,
}

impl FakeChip {
    pub fn new() -> Self {
        Self {
            registers: [0; 0x40],
            writes: [0; 0x40],
            fifo_in: Vec::new(),
            fifo_out: VecDeque::new(),
            replies: VecDeque::new(),
            sent: Vec::new(),
            tx_last_bits: Vec::new(),
            irq_polls: 0,
            resets: 0,
            stall_crc: false,
            ops: 0,
            fail_after: None,
        }
    }

    /// Queues the answer to the next transmitted frame. With nothing
    /// queued the field is empty and the chip timer fires.
    pub fn push_reply(&mut self, reply: Reply) -> &mut Self {
        self.replies.push_back(reply);
        self
    }

    /// Every bus access after the first `ops` fails.
    pub fn fail_after(&mut self, ops: usize) {
        self.fail_after = Some(self.ops + ops);
    }

    /// CalcCRC never raises CRCIRq.
    pub fn stall_crc(&mut self) {
        self.stall_crc = true;
    }

    pub fn register(&self, reg: Register) -> u8 {
        self.registers[reg as usize]
    }

    pub fn set_register(&mut self, reg: Register, value: u8) {
        self.registers[reg as usize] = value;
    }

    pub fn writes_to(&self, reg: Register) -> usize {
        self.writes[reg as usize]
    }

    pub fn sent_frames(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// TxLastBits of each transmitted frame, 0 meaning whole bytes.
    pub fn sent_last_bits(&self) -> &[u8] {
        &self.tx_last_bits
    }

    pub fn irq_polls(&self) -> usize {
        self.irq_polls
    }

    pub fn resets(&self) -> usize {
        self.resets
    }

    pub fn pending_replies(&self) -> usize {
        self.replies.len()
    }

    fn access(&mut self) -> Result<(), FakeBusError> {
        if matches!(self.fail_after, Some(limit) if self.ops >= limit) {
            return Err(FakeBusError);
        }
        self.ops += 1;
        Ok(())
    }

    fn write_one(&mut self, reg: u8, value: u8) {
        let idx = reg as usize;
        self.writes[idx] += 1;
        match reg {
            r if r == Register::CommandReg as u8 => {
                self.registers[idx] = value;
                if value == Command::SoftReset as u8 {
                    self.resets += 1;
                    self.registers[idx] = Command::Idle as u8;
                } else if value == Command::CalcCRC as u8 && !self.stall_crc {
                    let [low, high] = crc_a(&self.fifo_in);
                    self.registers[Register::CRCResultRegLow as usize] = low;
                    self.registers[Register::CRCResultRegHigh as usize] = high;
                    self.registers[Register::DivIrqReg as usize] |= CRC_IRQ;
                }
            }
            r if r == Register::ComIrqReg as u8 || r == Register::DivIrqReg as u8 => {
                // Set1/Set2: bit 7 selects whether marked bits are set or cleared
                if value & 0x80 != 0 {
                    self.registers[idx] |= value & 0x7F;
                } else {
                    self.registers[idx] &= !(value & 0x7F);
                }
            }
            r if r == Register::FIFOLevelReg as u8 => {
                if value & FLUSH_BUFFER != 0 {
                    self.fifo_in.clear();
                    self.fifo_out.clear();
                }
            }
            r if r == Register::FIFODataReg as u8 => self.fifo_in.push(value),
            r if r == Register::BitFramingReg as u8 => {
                let started = self.registers[idx] & START_SEND != 0;
                self.registers[idx] = value;
                let transceive = self.registers[Register::CommandReg as usize] == Command::Transceive as u8;
                if value & START_SEND != 0 && !started && transceive {
                    self.transmit(value & 0x07);
                }
            }
            _ => self.registers[idx] = value,
        }
    }

    fn transmit(&mut self, last_bits: u8) {
        self.sent.push(std::mem::take(&mut self.fifo_in));
        self.tx_last_bits.push(last_bits);
        let reply = self.replies.pop_front().unwrap_or_else(Reply::no_tag);
        self.registers[Register::ComIrqReg as usize] |= reply.irq;
        self.registers[Register::ErrorReg as usize] = reply.error;
        self.registers[Register::ControlReg as usize] = reply.last_bits;
        self.fifo_out = reply.data.into_iter().collect();
    }

    fn read_one(&mut self, reg: u8) -> u8 {
        match reg {
            r if r == Register::FIFODataReg as u8 => self.fifo_out.pop_front().unwrap_or(0),
            r if r == Register::FIFOLevelReg as u8 => self.fifo_out.len().min(0x40) as u8,
            r if r == Register::ComIrqReg as u8 => {
                self.irq_polls += 1;
                self.registers[reg as usize]
            }
            _ => self.registers[reg as usize],
        }
    }
}

impl Com for FakeChip {
    type Error = FakeBusError;

    fn read(&mut self, reg: u8, value: &mut [u8]) -> Result<(), FakeBusError> {
        self.access()?;
        for slot in value.iter_mut() {
            *slot = self.read_one(reg);
        }
        Ok(())
    }

    fn write(&mut self, reg: u8, value: &[u8]) -> Result<(), FakeBusError> {
        self.access()?;
        for &byte in value {
            self.write_one(reg, byte);
        }
        Ok(())
    }
}

/// ISO/IEC 14443-3 CRC_A (preset 0x6363), `[low, high]`.
pub fn crc_a(data: &[u8]) -> [u8; 2] {
    let mut crc: u16 = 0x6363;
    for &byte in data {
        let mut ch = byte ^ (crc & 0xFF) as u8;
        ch ^= ch << 4;
        let ch = ch as u16;
        crc = (crc >> 8) ^ (ch << 8) ^ (ch << 3) ^ (ch >> 4);
    }
    crc.to_le_bytes()
}
