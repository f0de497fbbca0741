//! dBase field descriptors.

use std::fmt;

use bitflags::bitflags;

use crate::error::Result;
use crate::io::cursor::BinaryCursor;

/// Size of a dBASE II field descriptor.
pub const DBASE2_DESCRIPTOR_LENGTH: usize = 16;
/// Size of a dBASE III/IV and Visual FoxPro field descriptor.
pub const DBASE3_DESCRIPTOR_LENGTH: usize = 32;
/// Size of a dBASE 7 field descriptor.
pub const DBASE7_DESCRIPTOR_LENGTH: usize = 48;

/// Field type, keyed by its one-character type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// `B`: binary (block number stored as text)
    Binary,
    /// `N`: numeric text
    Numeric,
    /// `F`: float text
    Float,
    /// `C`: character text
    Character,
    /// `D`: date text (`YYYYMMDD`)
    Date,
    /// `M`: memo block reference
    Memo,
    /// `G`: OLE / general block reference
    General,
    /// `L`: logical
    Logical,
    /// `I`: 4-byte signed integer
    Long,
    /// `+`: 4-byte autoincrement
    Autoincrement,
    /// `O`: 8-byte double
    Double,
}

impl FieldType {
    /// Look up a type code.
    pub fn from_code(code: char) -> Option<Self> {
        Some(match code {
            'B' => Self::Binary,
            'N' => Self::Numeric,
            'F' => Self::Float,
            'C' => Self::Character,
            'D' => Self::Date,
            'M' => Self::Memo,
            'G' => Self::General,
            'L' => Self::Logical,
            'I' => Self::Long,
            '+' => Self::Autoincrement,
            'O' => Self::Double,
            _ => return None,
        })
    }

    pub fn code(self) -> char {
        match self {
            Self::Binary => 'B',
            Self::Numeric => 'N',
            Self::Float => 'F',
            Self::Character => 'C',
            Self::Date => 'D',
            Self::Memo => 'M',
            Self::General => 'G',
            Self::Logical => 'L',
            Self::Long => 'I',
            Self::Autoincrement => '+',
            Self::Double => 'O',
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

bitflags! {
    /// Visual FoxPro field flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FieldFlags: u8 {
        /// System column, not visible to the user.
        const SYSTEM = 0x01;
        /// Column can store null values.
        const NULLABLE = 0x02;
        /// Binary column (character or memo only).
        const BINARY = 0x04;
        /// Autoincrementing column (stored together with `BINARY` as 0x0C).
        const AUTO_INCREMENT = 0x08;
    }
}

/// Autoincrement state stored in Visual FoxPro and dBASE 7 descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Autoincrement {
    pub next_value: u32,
    /// Step value; dBASE 7 does not store one and reports 1.
    pub step: u8,
}

/// One column of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name, cut at the first NUL.
    pub name: String,
    /// Raw type code; validated when records are decoded.
    pub type_code: char,
    /// Field width in bytes.
    pub length: u8,
    pub decimal_count: u8,
    /// In-memory address / displacement (dBASE II, III, Visual FoxPro).
    pub memory_address: Option<u32>,
    /// Work area id (dBASE III/IV).
    pub work_area_id: Option<u8>,
    /// Field flags (Visual FoxPro).
    pub flags: FieldFlags,
    /// Autoincrement state (Visual FoxPro, dBASE 7).
    pub autoincrement: Option<Autoincrement>,
    /// Production index (MDX) flag (dBASE IV, dBASE 7).
    pub indexed: bool,
}

impl FieldDescriptor {
    /// Create a descriptor with no version-specific attributes.
    pub fn new(name: impl Into<String>, field_type: FieldType, length: u8, decimal_count: u8) -> Self {
        Self {
            name: name.into(),
            type_code: field_type.code(),
            length,
            decimal_count,
            memory_address: None,
            work_area_id: None,
            flags: FieldFlags::empty(),
            autoincrement: None,
            indexed: false,
        }
    }

    /// The decoded type, or `None` for an unrecognized code.
    pub fn field_type(&self) -> Option<FieldType> {
        FieldType::from_code(self.type_code)
    }

    /// Read a 16-byte dBASE II descriptor.
    pub fn read_dbase2(cursor: &mut BinaryCursor<'_>, trim_name: bool) -> Result<Self> {
        let name = read_name(cursor, 11, trim_name)?;
        let type_code = cursor.read_char()?;
        let length = cursor.read_u8()?;
        let memory_address = cursor.read_u16()? as u32;
        let decimal_count = cursor.read_u8()?;
        Ok(Self {
            name,
            type_code,
            length,
            decimal_count,
            memory_address: Some(memory_address),
            work_area_id: None,
            flags: FieldFlags::empty(),
            autoincrement: None,
            indexed: false,
        })
    }

    /// Read a 32-byte dBASE III/IV descriptor.
    pub fn read_dbase3(cursor: &mut BinaryCursor<'_>, trim_name: bool) -> Result<Self> {
        let name = read_name(cursor, 11, trim_name)?;
        let type_code = cursor.read_char()?;
        let memory_address = cursor.read_u32()?;
        let length = cursor.read_u8()?;
        let decimal_count = cursor.read_u8()?;
        // reserved for multi-user dBASE
        cursor.skip(2)?;
        let work_area_id = cursor.read_u8()?;
        // reserved for multi-user dBASE, then the SET FIELDS flag
        cursor.skip(3)?;
        cursor.skip(7)?;
        let indexed = cursor.read_u8()? != 0;
        Ok(Self {
            name,
            type_code,
            length,
            decimal_count,
            memory_address: Some(memory_address),
            work_area_id: Some(work_area_id),
            flags: FieldFlags::empty(),
            autoincrement: None,
            indexed,
        })
    }

    /// Read a 32-byte Visual FoxPro descriptor.
    pub fn read_visual_foxpro(cursor: &mut BinaryCursor<'_>, trim_name: bool) -> Result<Self> {
        let name = read_name(cursor, 11, trim_name)?;
        let type_code = cursor.read_char()?;
        let displacement = cursor.read_u32()?;
        let length = cursor.read_u8()?;
        let decimal_count = cursor.read_u8()?;
        let flags = FieldFlags::from_bits_retain(cursor.read_u8()?);
        let next_value = cursor.read_u32()?;
        let step = cursor.read_u8()?;
        cursor.skip(8)?;
        let autoincrement = flags
            .contains(FieldFlags::AUTO_INCREMENT)
            .then_some(Autoincrement { next_value, step });
        Ok(Self {
            name,
            type_code,
            length,
            decimal_count,
            memory_address: Some(displacement),
            work_area_id: None,
            flags,
            autoincrement,
            indexed: false,
        })
    }

    /// Read a 48-byte dBASE 7 descriptor.
    pub fn read_dbase7(cursor: &mut BinaryCursor<'_>, trim_name: bool) -> Result<Self> {
        let name = read_name(cursor, 32, trim_name)?;
        let type_code = cursor.read_char()?;
        let length = cursor.read_u8()?;
        let decimal_count = cursor.read_u8()?;
        cursor.skip(2)?;
        let indexed = cursor.read_u8()? != 0;
        cursor.skip(2)?;
        let next_value = cursor.read_u32()?;
        cursor.skip(4)?;
        let autoincrement = (type_code == '+').then_some(Autoincrement {
            next_value,
            step: 1,
        });
        Ok(Self {
            name,
            type_code,
            length,
            decimal_count,
            memory_address: None,
            work_area_id: None,
            flags: FieldFlags::empty(),
            autoincrement,
            indexed,
        })
    }
}

/// Fixed-width name, cut at the first NUL (bytes after it are often garbage).
fn read_name(cursor: &mut BinaryCursor<'_>, width: usize, trim: bool) -> Result<String> {
    let raw = cursor.read_string(width)?;
    let name = raw.split('\0').next().unwrap_or_default();
    Ok(if trim {
        name.trim().to_string()
    } else {
        name.to_string()
    })
}
