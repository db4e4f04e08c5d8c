#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    REQA = 0x26, // REQuest command, Type A. Invites PICCs in state IDLE to go to READY. 7 bit frame.
    WUPA = 0x52, // Wake-UP command, Type A. Invites PICCs in state IDLE and HALT to go to READY. 7 bit frame.
    CT = 0x88,   // Cascade Tag. Not really a command, but used during anti collision.
    SelCl1 = 0x93, // Anti collision/Select, Cascade Level 1
    SelCl2 = 0x95, // Anti collision/Select, Cascade Level 2
    SelCl3 = 0x97, // Anti collision/Select, Cascade Level 3
}

impl From<Command> for u8 {
    #[inline(always)]
    fn from(variant: Command) -> Self {
        variant as _
    }
}

/// NVB for an anticollision frame: SEL and NVB only, no UID bits known yet.
pub const NVB_ANTICOLLISION: u8 = 0x20;
/// NVB for a select frame: seven whole bytes.
pub const NVB_SELECT: u8 = 0x70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeLevel {
    L1,
    L2,
    L3,
}

impl CascadeLevel {
    pub fn select_command(self) -> Command {
        match self {
            CascadeLevel::L1 => Command::SelCl1,
            CascadeLevel::L2 => Command::SelCl2,
            CascadeLevel::L3 => Command::SelCl3,
        }
    }

    pub fn next(self) -> Option<CascadeLevel> {
        match self {
            CascadeLevel::L1 => Some(CascadeLevel::L2),
            CascadeLevel::L2 => Some(CascadeLevel::L3),
            CascadeLevel::L3 => None,
        }
    }
}
