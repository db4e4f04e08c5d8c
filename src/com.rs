/// Register-level access to the reader chip.
///
/// Implementations carry no protocol knowledge: `reg` is the datasheet address
/// and every call is one blocking bus round trip.
pub trait Com {
    type Error: core::fmt::Debug;

    fn read(&mut self, reg: u8, value: &mut [u8]) -> Result<(), Self::Error>;
    fn write(&mut self, reg: u8, value: &[u8]) -> Result<(), Self::Error>;
}

impl<T: Com + ?Sized> Com for &mut T {
    type Error = T::Error;

    fn read(&mut self, reg: u8, value: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(reg, value)
    }
    fn write(&mut self, reg: u8, value: &[u8]) -> Result<(), Self::Error> {
        (**self).write(reg, value)
    }
}
