//! dBase version byte and header layout selection.

use std::fmt;

/// Known dBase version bytes (first byte of the file).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DbfVersion {
    /// FoxBASE / dBASE II
    FoxBase = 0x02,
    /// FoxBASE+ / dBASE III PLUS, no memo
    DBase3 = 0x03,
    /// dBASE Level 7
    DBase7 = 0x04,
    /// Visual FoxPro
    VisualFoxPro = 0x30,
    /// Visual FoxPro, autoincrement enabled
    VisualFoxProAutoIncrement = 0x31,
    /// Visual FoxPro with Varchar/Varbinary fields
    VisualFoxProVarchar = 0x32,
    /// dBASE IV SQL table files, no memo
    DBase4SqlTable = 0x43,
    /// dBASE IV SQL system files, no memo
    DBase4SqlSystem = 0x63,
    /// FoxBASE+ / dBASE III PLUS, with memo
    DBase3Memo = 0x83,
    /// dBASE IV with memo
    DBase4Memo = 0x8B,
    /// dBASE IV SQL table files, with memo
    DBase4SqlTableMemo = 0xCB,
    /// HiPer-Six format with SMT memo file
    HiPerSixMemo = 0xE5,
    /// FoxPro 2.x (or earlier) with memo
    FoxPro2Memo = 0xF5,
    /// FoxBASE
    FoxBaseMemo = 0xFB,
}

/// On-disk header layout family. Each has its own preamble and
/// field-descriptor shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderLayout {
    /// 8-byte preamble, 16-byte descriptors, fixed 521-byte header.
    DBase2,
    /// 32-byte preamble, 32-byte descriptors.
    DBase3,
    /// 32-byte preamble, 32-byte descriptors with flags, 263-byte backlink.
    VisualFoxPro,
    /// 68-byte preamble, 48-byte descriptors.
    DBase7,
}

impl DbfVersion {
    /// Look up a version byte.
    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0x02 => Self::FoxBase,
            0x03 => Self::DBase3,
            0x04 => Self::DBase7,
            0x30 => Self::VisualFoxPro,
            0x31 => Self::VisualFoxProAutoIncrement,
            0x32 => Self::VisualFoxProVarchar,
            0x43 => Self::DBase4SqlTable,
            0x63 => Self::DBase4SqlSystem,
            0x83 => Self::DBase3Memo,
            0x8B => Self::DBase4Memo,
            0xCB => Self::DBase4SqlTableMemo,
            0xE5 => Self::HiPerSixMemo,
            0xF5 => Self::FoxPro2Memo,
            0xFB => Self::FoxBaseMemo,
            _ => return None,
        })
    }

    /// The version byte as stored in the file.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Header layout used by this version.
    pub fn layout(self) -> HeaderLayout {
        match self {
            Self::FoxBase => HeaderLayout::DBase2,
            Self::VisualFoxPro | Self::VisualFoxProAutoIncrement | Self::VisualFoxProVarchar => {
                HeaderLayout::VisualFoxPro
            }
            Self::DBase7 => HeaderLayout::DBase7,
            Self::DBase3
            | Self::DBase4SqlTable
            | Self::DBase4SqlSystem
            | Self::DBase3Memo
            | Self::DBase4Memo
            | Self::DBase4SqlTableMemo
            | Self::HiPerSixMemo
            | Self::FoxPro2Memo
            | Self::FoxBaseMemo => HeaderLayout::DBase3,
        }
    }

    /// Whether the version byte announces an accompanying memo file.
    pub fn has_memo(self) -> bool {
        matches!(
            self,
            Self::DBase3Memo
                | Self::DBase4Memo
                | Self::DBase4SqlTableMemo
                | Self::HiPerSixMemo
                | Self::FoxPro2Memo
                | Self::FoxBaseMemo
        )
    }
}

impl fmt::Display for DbfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({:#04X})", self, self.code())
    }
}
