use crate::com::Com;
use crate::error::Error;
use crate::mfrc522::{CommandOutcome, Mfrc522, Result, Status};
use crate::picc::{self, CascadeLevel};
use crate::register::{Command, Register};
use crate::uid::TagUid;
use alloc::vec::Vec;

/// ATQA is always 16 bits.
const ATQA_BITS: usize = 16;
/// SAK plus CRC_A.
const SAK_BITS: usize = 24;

/// Progress through REQA -> ANTICOLLISION -> SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CascadeState {
    Requesting,
    Colliding(CascadeLevel),
    Selecting(CascadeLevel, [u8; 5]),
    Done,
}

fn bcc(uid: &[u8]) -> u8 {
    uid.iter().fold(0u8, |acc, b| acc ^ b)
}

fn failure<E>(outcome: &CommandOutcome) -> Error<E> {
    match outcome.status {
        Status::NoTag => Error::NoTag,
        _ if outcome.error_flags != 0 => Error::Communication(outcome.error_flags),
        _ => Error::Timeout,
    }
}

impl<C: Com> Mfrc522<C> {
    /// Sends REQA or WUPA as a 7 bit short frame and returns the ATQA.
    pub fn request(&mut self, command: picc::Command) -> Result<[u8; 2], C::Error> {
        // For REQA and WUPA we need the short frame format - transmit only 7 bits of the last (and only) byte.
        self.write_register(Register::BitFramingReg, 0x07)?;
        let outcome = self.execute(Command::Transceive, &[u8::from(command)])?;
        match outcome.status {
            Status::Ok if outcome.bits == ATQA_BITS => Ok([outcome.data[0], outcome.data[1]]),
            Status::Ok => Err(Error::Frame {
                expected_bits: ATQA_BITS,
                actual_bits: outcome.bits,
            }),
            _ => Err(failure(&outcome)),
        }
    }

    /// ANTICOLLISION at `level`: four UID bytes and their BCC, checked.
    pub fn anticollide(&mut self, level: CascadeLevel) -> Result<[u8; 5], C::Error> {
        self.write_register(Register::BitFramingReg, 0x00)?;
        let frame = [level.select_command().into(), picc::NVB_ANTICOLLISION];
        let outcome = self.execute(Command::Transceive, &frame)?;
        if !outcome.is_ok() {
            return Err(failure(&outcome));
        }
        let fragment: [u8; 5] = match outcome.data.as_slice().try_into() {
            Ok(fragment) => fragment,
            Err(_) => {
                return Err(Error::Frame {
                    expected_bits: 40,
                    actual_bits: outcome.bits,
                })
            }
        };
        let expected = bcc(&fragment[..4]);
        if expected != fragment[4] {
            log::debug!("{:?} BCC mismatch in {:02x?}", level, fragment);
            return Err(Error::Checksum {
                expected,
                actual: fragment[4],
            });
        }
        log::debug!("{:?} anticollision {:02x?}", level, fragment);
        Ok(fragment)
    }

    /// SELECT at `level` with the fragment returned by `anticollide`.
    pub fn select(&mut self, level: CascadeLevel, fragment: &[u8; 5]) -> Result<(), C::Error> {
        let mut buffer = [0u8; 9];
        buffer[0] = level.select_command().into();
        buffer[1] = picc::NVB_SELECT;
        buffer[2..7].copy_from_slice(fragment);
        let crc = self.calculate_crc(&buffer[..7])?;
        buffer[7..].copy_from_slice(&crc);

        let outcome = self.execute(Command::Transceive, &buffer)?;
        match outcome.status {
            Status::Ok if outcome.bits == SAK_BITS => {
                log::debug!("{:?} selected, SAK {:#04x}", level, outcome.data[0]);
                Ok(())
            }
            Status::Ok => Err(Error::Frame {
                expected_bits: SAK_BITS,
                actual_bits: outcome.bits,
            }),
            _ => Err(failure(&outcome)),
        }
    }

    /// REQA followed by every cascade level the card needs.
    pub fn cascade(&mut self) -> Result<TagUid, C::Error> {
        self.run_cascade(CascadeState::Requesting)
    }

    /// Anticollision and select from level 1, for a card already made READY.
    pub fn read_uid(&mut self) -> Result<TagUid, C::Error> {
        self.run_cascade(CascadeState::Colliding(CascadeLevel::L1))
    }

    fn run_cascade(&mut self, start: CascadeState) -> Result<TagUid, C::Error> {
        let mut uid = Vec::with_capacity(10);
        let mut state = start;
        loop {
            state = match state {
                CascadeState::Requesting => {
                    self.request(picc::Command::REQA)?;
                    CascadeState::Colliding(CascadeLevel::L1)
                }
                CascadeState::Colliding(level) => {
                    let fragment = self.anticollide(level)?;
                    CascadeState::Selecting(level, fragment)
                }
                CascadeState::Selecting(level, fragment) => {
                    self.select(level, &fragment)?;
                    match level.next() {
                        Some(next) if fragment[0] == picc::Command::CT as u8 => {
                            log::debug!("cascade tag at {:?}, continuing at {:?}", level, next);
                            uid.extend_from_slice(&fragment[1..4]);
                            CascadeState::Colliding(next)
                        }
                        _ => {
                            uid.extend_from_slice(&fragment[..4]);
                            CascadeState::Done
                        }
                    }
                }
                CascadeState::Done => break,
            };
        }
        // 4, 7 or 10 bytes by construction
        TagUid::new(uid).ok_or(Error::Frame {
            expected_bits: 32,
            actual_bits: 0,
        })
    }
}
