#![cfg_attr(not(feature = "std"), no_std)]
extern crate alloc;

pub mod anticollision;
pub mod com;
pub mod com_i2c;
pub mod config;
pub mod error;
pub mod mfrc522;
pub mod picc;
pub mod poll;
pub mod register;
pub mod session;
#[cfg(feature = "std")]
pub mod store;
pub mod uid;

#[cfg(test)]
mod testutils;

pub use com::Com;
pub use com_i2c::ComI2c;
pub use config::Config;
pub use error::Error;
#[cfg(feature = "std")]
pub use error::{ScanError, StoreError};
pub use mfrc522::{CommandOutcome, Mfrc522, Status};
pub use picc::CascadeLevel;
pub use session::TagSession;
#[cfg(feature = "std")]
pub use store::AllowListStore;
pub use uid::{classify, Detection, TagIdentification, TagKind, TagUid};
