use super::com::Com;
use alloc::vec::Vec;
use embedded_hal::blocking::i2c;

pub struct ComI2c<I2C> {
    com: I2C,
    addr: u8,
}
impl<I2C> ComI2c<I2C> {
    /// Address with both address-select switches off.
    pub const DEFAULT_ADDRESS: u8 = 0x2C;

    pub fn new(i2c: I2C, addr: u8) -> Self {
        Self { com: i2c, addr }
    }

    /// Address from the two switches on the module pad:
    /// `[off, off]` 0x2C, `[on, off]` 0x2D, `[off, on]` 0x2E, `[on, on]` 0x2F.
    pub fn with_switches(i2c: I2C, asw: [bool; 2]) -> Self {
        let addr = Self::DEFAULT_ADDRESS + asw[0] as u8 + 2 * asw[1] as u8;
        Self::new(i2c, addr)
    }

    pub fn address(&self) -> u8 {
        self.addr
    }

    pub fn release(self) -> I2C {
        self.com
    }
}
impl<I2C, E> Com for ComI2c<I2C>
where
    I2C: i2c::Read<Error = E> + i2c::Write<Error = E>,
    E: core::fmt::Debug,
{
    type Error = E;

    fn read(&mut self, reg: u8, value: &mut [u8]) -> Result<(), E> {
        self.com.write(self.addr, &[reg])?;
        self.com.read(self.addr, value)
    }
    fn write(&mut self, reg: u8, value: &[u8]) -> Result<(), E> {
        let mut tx_buf = Vec::with_capacity(value.len() + 1);
        tx_buf.push(reg);
        tx_buf.extend_from_slice(value);
        self.com.write(self.addr, &tx_buf)
    }
}
