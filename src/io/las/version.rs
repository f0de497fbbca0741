//! LAS format versions.

use std::fmt;

/// Known LAS versions, one header layout each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LasVersion {
    V1_0,
    V1_1,
    V1_2,
    V1_3,
    V1_4,
}

impl LasVersion {
    /// Map a (major, minor) pair to a known version.
    pub fn from_pair(major: u8, minor: u8) -> Option<Self> {
        match (major, minor) {
            (1, 0) => Some(Self::V1_0),
            (1, 1) => Some(Self::V1_1),
            (1, 2) => Some(Self::V1_2),
            (1, 3) => Some(Self::V1_3),
            (1, 4) => Some(Self::V1_4),
            _ => None,
        }
    }

    pub fn major(self) -> u8 {
        1
    }

    pub fn minor(self) -> u8 {
        match self {
            Self::V1_0 => 0,
            Self::V1_1 => 1,
            Self::V1_2 => 2,
            Self::V1_3 => 3,
            Self::V1_4 => 4,
        }
    }

    /// Size of the public header block for this version.
    pub fn header_size(self) -> u16 {
        match self {
            Self::V1_0 | Self::V1_1 | Self::V1_2 => 227,
            Self::V1_3 => 235,
            Self::V1_4 => 375,
        }
    }

    /// Whether bytes 6..8 hold the global encoding word.
    pub fn has_global_encoding(self) -> bool {
        self >= Self::V1_2
    }
}

impl fmt::Display for LasVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}
