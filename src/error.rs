use thiserror::Error;

/// Failures of a reader operation; `E` is the bus error of the `Com` in use.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error<E> {
    /// 通信接口出错
    #[error("bus transport fault: {0:?}")]
    Com(E),
    /// The interrupt poll budget ran out before the chip finished.
    #[error("reader did not complete the command within its poll budget")]
    Timeout,
    /// The chip's timer fired: nobody answered.
    #[error("no tag answered")]
    NoTag,
    /// ErrorReg had collision, parity, protocol or overflow bits set.
    #[error("reader reported error flags {0:#04x}")]
    Communication(u8),
    /// Anticollision BCC did not match the XOR of the four UID bytes.
    #[error("UID check byte mismatch: computed {expected:#04x}, received {actual:#04x}")]
    Checksum { expected: u8, actual: u8 },
    /// The reply was not the length the protocol step requires.
    #[error("expected a {expected_bits}-bit reply, got {actual_bits} bits")]
    Frame { expected_bits: usize, actual_bits: usize },
    /// The CRC coprocessor never raised CRCIRq.
    #[error("CRC coprocessor did not finish")]
    Crc,
}

impl<E> Error<E> {
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Com(_))
    }
}

#[cfg(feature = "std")]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("list file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("list file encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid list name {0:?}")]
    InvalidName(alloc::string::String),
}

/// A scan-and-update call failed either at the reader or at the list file.
#[cfg(feature = "std")]
#[derive(Debug, Error)]
pub enum ScanError<E> {
    #[error("reader: {0}")]
    Reader(Error<E>),
    #[error("allow list: {0}")]
    Store(#[from] StoreError),
}

#[cfg(feature = "std")]
impl<E> From<Error<E>> for ScanError<E> {
    fn from(e: Error<E>) -> Self {
        ScanError::Reader(e)
    }
}
