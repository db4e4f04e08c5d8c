use crate::com::Com;
use crate::mfrc522::{Mfrc522, Result};
use crate::picc;
use crate::uid::{Detection, TagIdentification};
use alloc::string::String;

/// Owns the reader for "detect then identify" calls.
///
/// Only bus faults (`Error::Com`) come back as `Err`; a missing or unreadable
/// card is an ordinary `present = false` / `success = false` result.
pub struct TagSession<C> {
    reader: Mfrc522<C>,
}

impl<C: Com> TagSession<C> {
    pub fn new(reader: Mfrc522<C>) -> Self {
        Self { reader }
    }

    pub fn reader(&mut self) -> &mut Mfrc522<C> {
        &mut self.reader
    }

    pub fn into_reader(self) -> Mfrc522<C> {
        self.reader
    }

    pub fn detect(&mut self) -> Result<Detection, C::Error> {
        match self.reader.request(picc::Command::REQA) {
            Ok(atqa) => Ok(Detection {
                present: true,
                bits: 16,
                atqa: Some(atqa),
            }),
            Err(e) if e.is_transport() => Err(e),
            Err(e) => {
                log::trace!("no tag: {}", e);
                Ok(Detection::absent())
            }
        }
    }

    /// Detects a card, retrying detection once, and reads its UID.
    pub fn identify(&mut self) -> Result<TagIdentification, C::Error> {
        let mut detection = self.detect()?;
        if !detection.present {
            // the card may not have settled in the field yet
            detection = self.detect()?;
        }
        if !detection.present {
            return Ok(TagIdentification::failed());
        }
        match self.reader.read_uid() {
            Ok(uid) => {
                log::debug!("read {} tag {}", uid.kind().map_or("?", |k| k.as_str()), uid);
                Ok(TagIdentification::found(uid))
            }
            Err(e) if e.is_transport() => Err(e),
            Err(e) => {
                log::debug!("tag present but UID not read: {}", e);
                Ok(TagIdentification::failed())
            }
        }
    }

    /// Formatted UID of the card in the field, empty when none was read.
    pub fn read_id(&mut self) -> Result<String, C::Error> {
        Ok(self.identify()?.formatted)
    }

    pub fn tag_present(&mut self) -> Result<bool, C::Error> {
        Ok(self.identify()?.success)
    }

    pub fn scan_card(&mut self) -> Result<Option<String>, C::Error> {
        let id = self.identify()?;
        Ok(if id.success { Some(id.formatted) } else { None })
    }

    pub fn reset_chip(&mut self) -> Result<(), C::Error> {
        self.reader.reset()
    }

    pub fn antenna_on(&mut self) -> Result<(), C::Error> {
        self.reader.antenna_on()
    }

    pub fn antenna_off(&mut self) -> Result<(), C::Error> {
        self.reader.antenna_off()
    }
}
