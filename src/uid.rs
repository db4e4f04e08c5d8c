use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

/// Card family inferred from the UID length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Single size UID, 4 bytes.
    Classic,
    /// Double or triple size UID, 7 or 10 bytes.
    Ntag,
}

impl TagKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TagKind::Classic => "classic",
            TagKind::Ntag => "ntag",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The UID can have 4, 7 or 10 bytes. Empty when nothing was read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TagUid {
    bytes: Vec<u8>,
}

impl TagUid {
    /// Accepts only the sizes a cascade can produce.
    pub fn new(bytes: Vec<u8>) -> Option<Self> {
        match bytes.len() {
            4 | 7 | 10 => Some(Self { bytes }),
            _ => None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn kind(&self) -> Option<TagKind> {
        classify(&self.bytes)
    }

    /// Colon separated uppercase hex, e.g. `04:12:34:01:02:03:04`.
    pub fn formatted(&self) -> String {
        use core::fmt::Write;
        let mut s = String::with_capacity(self.bytes.len() * 3);
        // writing into a String cannot fail
        let _ = write!(s, "{}", self);
        s
    }
}

impl fmt::Display for TagUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, b) in self.bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseUidError;

impl fmt::Display for ParseUidError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("not a 4, 7 or 10 byte colon separated hex UID")
    }
}

impl FromStr for TagUid {
    type Err = ParseUidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s
            .split(':')
            .map(|part| {
                if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return Err(ParseUidError);
                }
                u8::from_str_radix(part, 16).map_err(|_| ParseUidError)
            })
            .collect::<Result<Vec<u8>, _>>()?;
        TagUid::new(bytes).ok_or(ParseUidError)
    }
}

/// 4 bytes is a classic card, 7 or 10 bytes an NTAG-style card.
pub fn classify(uid: &[u8]) -> Option<TagKind> {
    match uid.len() {
        4 => Some(TagKind::Classic),
        7 | 10 => Some(TagKind::Ntag),
        _ => None,
    }
}

/// Answer to a REQA/WUPA probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub present: bool,
    /// Bits received in reply to the request.
    pub bits: usize,
    /// Answer To reQuest A, when a card replied.
    pub atqa: Option<[u8; 2]>,
}

impl Detection {
    pub fn absent() -> Self {
        Self {
            present: false,
            bits: 0,
            atqa: None,
        }
    }
}

/// Result of one `identify` attempt. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagIdentification {
    pub success: bool,
    pub uid: TagUid,
    pub formatted: String,
    pub kind: Option<TagKind>,
}

impl TagIdentification {
    pub fn found(uid: TagUid) -> Self {
        Self {
            success: true,
            formatted: uid.formatted(),
            kind: uid.kind(),
            uid,
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            uid: TagUid::empty(),
            formatted: String::new(),
            kind: None,
        }
    }
}
