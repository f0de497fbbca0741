//! dBase table header, one parser per layout family.
//!
//! Every layout reads a fixed preamble, then a field-descriptor array whose
//! length comes from one of two policies:
//!
//! - **derived**: the count follows from the declared header length
//!   (dBASE III/IV, dBASE 7);
//! - **scanned**: descriptors are read until the terminator byte shows up or
//!   the descriptor area ends (dBASE II, Visual FoxPro).
//!
//! A single `0x0D` terminator is expected after the array; when it is
//! missing a warning is recorded and decoding continues.

use bitflags::bitflags;
use encoding_rs::Encoding;

use crate::error::Result;
use crate::io::cursor::{strip_nul, BinaryCursor};
use crate::notification::{NotificationCollection, NotificationType};

use super::code_page::encoding_from_language_driver;
use super::field::{
    FieldDescriptor, DBASE2_DESCRIPTOR_LENGTH, DBASE3_DESCRIPTOR_LENGTH, DBASE7_DESCRIPTOR_LENGTH,
};
use super::version::{DbfVersion, HeaderLayout};

/// Byte closing the field-descriptor array.
pub const FIELD_TERMINATOR: u8 = 0x0D;

/// dBASE II header size: 8-byte preamble, 32 descriptors, terminator.
pub const DBASE2_HEADER_LENGTH: usize = 8 + 32 * DBASE2_DESCRIPTOR_LENGTH + 1;
const DBASE3_PREAMBLE_LENGTH: usize = 32;
const DBASE7_PREAMBLE_LENGTH: usize = 68;
/// Visual FoxPro database container path following the terminator.
pub const BACKLINK_LENGTH: usize = 263;

bitflags! {
    /// Visual FoxPro table flags (byte 28).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TableFlags: u8 {
        /// Table has a structural `.cdx` index.
        const STRUCTURAL_INDEX = 0x01;
        /// Table has a memo file.
        const MEMO = 0x02;
        /// Table is a database container.
        const DATABASE = 0x04;
    }
}

/// Date of last update. The year is stored as an offset from 1900.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LastUpdate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

/// Layout-specific header attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderExtra {
    DBase2,
    DBase3 {
        incomplete_transaction: bool,
        encrypted: bool,
        production_mdx: bool,
        language_driver: u8,
    },
    VisualFoxPro {
        table_flags: TableFlags,
        code_page_mark: u8,
        /// Path of the owning database container, empty for free tables.
        backlink: String,
    },
    DBase7 {
        incomplete_transaction: bool,
        encrypted: bool,
        production_mdx: bool,
        language_driver: u8,
        language_driver_name: String,
    },
}

/// Decoded table header.
#[derive(Debug, Clone, PartialEq)]
pub struct DbfHeader {
    pub version: DbfVersion,
    pub last_update: LastUpdate,
    /// Declared number of records.
    pub record_count: u32,
    /// Declared header length; records start here.
    pub header_length: u16,
    /// Declared record length, including the deleted flag.
    pub record_length: u16,
    pub fields: Vec<FieldDescriptor>,
    pub extra: HeaderExtra,
    /// Whether the descriptor array was closed by a terminator byte.
    pub terminated: bool,
}

impl DbfHeader {
    /// Language driver / code page byte, when the layout has one.
    pub fn language_driver(&self) -> Option<u8> {
        match &self.extra {
            HeaderExtra::DBase2 => None,
            HeaderExtra::DBase3 {
                language_driver, ..
            }
            | HeaderExtra::DBase7 {
                language_driver, ..
            } => Some(*language_driver),
            HeaderExtra::VisualFoxPro { code_page_mark, .. } => Some(*code_page_mark),
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// How the descriptor array length is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldCountPolicy {
    /// At most this many descriptors, fewer if the terminator comes first.
    Derived(usize),
    /// Until the terminator byte or until no full descriptor fits before
    /// `limit`.
    ScanToTerminator { limit: usize },
}

/// Text decoding options passed down from the reader configuration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeaderOptions {
    pub encoding: Option<&'static Encoding>,
    pub trim_field_names: bool,
}

impl HeaderLayout {
    /// Parse the header that follows the version byte.
    ///
    /// The cursor must sit right after the version byte; on return it sits
    /// at the first record.
    pub(crate) fn read_header(
        self,
        cursor: &mut BinaryCursor<'_>,
        version: DbfVersion,
        options: HeaderOptions,
        notifications: &mut NotificationCollection,
    ) -> Result<DbfHeader> {
        log::debug!("dBase version {} uses the {:?} header layout", version, self);
        let header = match self {
            HeaderLayout::DBase2 => read_dbase2_header(cursor, version, options, notifications)?,
            HeaderLayout::DBase3 => read_dbase3_header(cursor, version, options, notifications)?,
            HeaderLayout::VisualFoxPro => {
                read_visual_foxpro_header(cursor, version, options, notifications)?
            }
            HeaderLayout::DBase7 => read_dbase7_header(cursor, version, options, notifications)?,
        };
        log::debug!(
            "dBase header: {} field(s), {} record(s) of {} bytes",
            header.fields.len(),
            header.record_count,
            header.record_length
        );
        Ok(header)
    }
}

fn apply_encoding(cursor: &mut BinaryCursor<'_>, options: HeaderOptions, language_driver: u8) {
    let encoding = options
        .encoding
        .or_else(|| encoding_from_language_driver(language_driver))
        .unwrap_or(encoding_rs::WINDOWS_1252);
    log::trace!("dBase text encoding: {}", encoding.name());
    cursor.set_encoding(encoding);
}

/// Read the descriptor array and its terminator.
fn read_fields(
    cursor: &mut BinaryCursor<'_>,
    policy: FieldCountPolicy,
    descriptor_length: usize,
    read: fn(&mut BinaryCursor<'_>, bool) -> Result<FieldDescriptor>,
    options: HeaderOptions,
    notifications: &mut NotificationCollection,
) -> Result<(Vec<FieldDescriptor>, bool)> {
    let mut fields = Vec::new();
    match policy {
        FieldCountPolicy::Derived(count) => {
            // the declared header length may also cover data after the terminator
            for _ in 0..count {
                if cursor.peek_u8_at(cursor.position()).ok() == Some(FIELD_TERMINATOR) {
                    break;
                }
                fields.push(read(cursor, options.trim_field_names)?);
            }
        }
        FieldCountPolicy::ScanToTerminator { limit } => {
            while cursor.position() + descriptor_length <= limit
                && cursor.peek_u8_at(cursor.position())? != FIELD_TERMINATOR
            {
                fields.push(read(cursor, options.trim_field_names)?);
            }
        }
    }

    let offset = cursor.position();
    let terminated = !cursor.is_end_of_file() && cursor.peek_u8_at(offset)? == FIELD_TERMINATOR;
    if terminated {
        cursor.skip(1)?;
    } else {
        notifications.notify(
            NotificationType::Warning,
            offset,
            "Field descriptor array is not followed by a terminator byte",
        );
    }
    Ok((fields, terminated))
}

/// Move to the first record at the declared header length.
fn seek_to_records(
    cursor: &mut BinaryCursor<'_>,
    header_length: usize,
    notifications: &mut NotificationCollection,
) -> Result<()> {
    if header_length >= cursor.position() {
        cursor.seek(header_length)
    } else {
        notifications.notify(
            NotificationType::Warning,
            cursor.position(),
            format!(
                "Declared header length {} ends inside the field descriptors",
                header_length
            ),
        );
        Ok(())
    }
}

fn read_dbase2_header(
    cursor: &mut BinaryCursor<'_>,
    version: DbfVersion,
    options: HeaderOptions,
    notifications: &mut NotificationCollection,
) -> Result<DbfHeader> {
    let record_count = cursor.read_u16()? as u32;
    let month = cursor.read_u8()?;
    let day = cursor.read_u8()?;
    let year = 1900 + cursor.read_u8()? as u16;
    let record_length = cursor.read_u16()?;
    apply_encoding(cursor, options, 0);

    let (fields, terminated) = read_fields(
        cursor,
        FieldCountPolicy::ScanToTerminator {
            limit: DBASE2_HEADER_LENGTH - 1,
        },
        DBASE2_DESCRIPTOR_LENGTH,
        FieldDescriptor::read_dbase2,
        options,
        notifications,
    )?;
    seek_to_records(cursor, DBASE2_HEADER_LENGTH, notifications)?;

    Ok(DbfHeader {
        version,
        last_update: LastUpdate { year, month, day },
        record_count,
        header_length: DBASE2_HEADER_LENGTH as u16,
        record_length,
        fields,
        extra: HeaderExtra::DBase2,
        terminated,
    })
}

/// Shared 31-byte preamble of the dBASE III, Visual FoxPro and dBASE 7 layouts.
struct Preamble {
    last_update: LastUpdate,
    record_count: u32,
    header_length: u16,
    record_length: u16,
    incomplete_transaction: bool,
    encrypted: bool,
    table_flags: u8,
    language_driver: u8,
}

fn read_preamble(cursor: &mut BinaryCursor<'_>) -> Result<Preamble> {
    let year = 1900 + cursor.read_u8()? as u16;
    let month = cursor.read_u8()?;
    let day = cursor.read_u8()?;
    let record_count = cursor.read_u32()?;
    let header_length = cursor.read_u16()?;
    let record_length = cursor.read_u16()?;
    cursor.skip(2)?;
    let incomplete_transaction = cursor.read_u8()? != 0;
    let encrypted = cursor.read_u8()? != 0;
    // free record thread and multi-user reserved area
    cursor.skip(12)?;
    let table_flags = cursor.read_u8()?;
    let language_driver = cursor.read_u8()?;
    cursor.skip(2)?;
    Ok(Preamble {
        last_update: LastUpdate { year, month, day },
        record_count,
        header_length,
        record_length,
        incomplete_transaction,
        encrypted,
        table_flags,
        language_driver,
    })
}

fn derived_count(header_length: u16, preamble_length: usize, descriptor_length: usize) -> usize {
    (header_length as usize).saturating_sub(preamble_length + 1) / descriptor_length
}

fn read_dbase3_header(
    cursor: &mut BinaryCursor<'_>,
    version: DbfVersion,
    options: HeaderOptions,
    notifications: &mut NotificationCollection,
) -> Result<DbfHeader> {
    let preamble = read_preamble(cursor)?;
    apply_encoding(cursor, options, preamble.language_driver);

    let count = derived_count(
        preamble.header_length,
        DBASE3_PREAMBLE_LENGTH,
        DBASE3_DESCRIPTOR_LENGTH,
    );
    let (fields, terminated) = read_fields(
        cursor,
        FieldCountPolicy::Derived(count),
        DBASE3_DESCRIPTOR_LENGTH,
        FieldDescriptor::read_dbase3,
        options,
        notifications,
    )?;
    seek_to_records(cursor, preamble.header_length as usize, notifications)?;

    Ok(DbfHeader {
        version,
        last_update: preamble.last_update,
        record_count: preamble.record_count,
        header_length: preamble.header_length,
        record_length: preamble.record_length,
        fields,
        extra: HeaderExtra::DBase3 {
            incomplete_transaction: preamble.incomplete_transaction,
            encrypted: preamble.encrypted,
            production_mdx: preamble.table_flags != 0,
            language_driver: preamble.language_driver,
        },
        terminated,
    })
}

fn read_visual_foxpro_header(
    cursor: &mut BinaryCursor<'_>,
    version: DbfVersion,
    options: HeaderOptions,
    notifications: &mut NotificationCollection,
) -> Result<DbfHeader> {
    let preamble = read_preamble(cursor)?;
    apply_encoding(cursor, options, preamble.language_driver);

    let limit = (preamble.header_length as usize).saturating_sub(BACKLINK_LENGTH);
    let (fields, terminated) = read_fields(
        cursor,
        FieldCountPolicy::ScanToTerminator { limit },
        DBASE3_DESCRIPTOR_LENGTH,
        FieldDescriptor::read_visual_foxpro,
        options,
        notifications,
    )?;

    let backlink = if cursor.position() + BACKLINK_LENGTH <= preamble.header_length as usize {
        strip_nul(&cursor.read_string(BACKLINK_LENGTH)?)
    } else {
        String::new()
    };
    seek_to_records(cursor, preamble.header_length as usize, notifications)?;

    Ok(DbfHeader {
        version,
        last_update: preamble.last_update,
        record_count: preamble.record_count,
        header_length: preamble.header_length,
        record_length: preamble.record_length,
        fields,
        extra: HeaderExtra::VisualFoxPro {
            table_flags: TableFlags::from_bits_retain(preamble.table_flags),
            code_page_mark: preamble.language_driver,
            backlink,
        },
        terminated,
    })
}

fn read_dbase7_header(
    cursor: &mut BinaryCursor<'_>,
    version: DbfVersion,
    options: HeaderOptions,
    notifications: &mut NotificationCollection,
) -> Result<DbfHeader> {
    let preamble = read_preamble(cursor)?;
    apply_encoding(cursor, options, preamble.language_driver);
    let language_driver_name = strip_nul(&cursor.read_string(32)?);
    cursor.skip(4)?;

    let count = derived_count(
        preamble.header_length,
        DBASE7_PREAMBLE_LENGTH,
        DBASE7_DESCRIPTOR_LENGTH,
    );
    let (fields, terminated) = read_fields(
        cursor,
        FieldCountPolicy::Derived(count),
        DBASE7_DESCRIPTOR_LENGTH,
        FieldDescriptor::read_dbase7,
        options,
        notifications,
    )?;
    seek_to_records(cursor, preamble.header_length as usize, notifications)?;

    Ok(DbfHeader {
        version,
        last_update: preamble.last_update,
        record_count: preamble.record_count,
        header_length: preamble.header_length,
        record_length: preamble.record_length,
        fields,
        extra: HeaderExtra::DBase7 {
            incomplete_transaction: preamble.incomplete_transaction,
            encrypted: preamble.encrypted,
            production_mdx: preamble.table_flags != 0,
            language_driver: preamble.language_driver,
            language_driver_name,
        },
        terminated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> HeaderOptions {
        HeaderOptions {
            encoding: None,
            trim_field_names: true,
        }
    }

    #[test]
    fn test_derived_count() {
        assert_eq!(derived_count(65, 32, 32), 1);
        assert_eq!(derived_count(97, 32, 32), 2);
        assert_eq!(derived_count(10, 32, 32), 0);
        assert_eq!(derived_count(68 + 48 * 2 + 1, 68, 48), 2);
    }

    #[test]
    fn test_dbase3_header_without_terminator_warns() {
        // preamble + one descriptor, header length claims one field but no 0x0D
        let mut bytes = vec![0u8; 64];
        bytes[0] = 0x03;
        bytes[4..8].copy_from_slice(&0u32.to_le_bytes());
        bytes[8..10].copy_from_slice(&65u16.to_le_bytes());
        bytes[10..12].copy_from_slice(&2u16.to_le_bytes());
        bytes[32] = b'A';
        bytes[43] = b'C';
        bytes[48] = 1;
        bytes.push(0x20);

        let mut cursor = BinaryCursor::new(&bytes);
        cursor.skip(1).unwrap();
        let mut notifications = NotificationCollection::new();
        let header = HeaderLayout::DBase3
            .read_header(&mut cursor, DbfVersion::DBase3, options(), &mut notifications)
            .unwrap();
        assert_eq!(header.fields.len(), 1);
        assert!(!header.terminated);
        assert!(notifications.has_type(NotificationType::Warning));
        assert_eq!(cursor.position(), 65);
    }

    #[test]
    fn test_dbase2_header_scans_to_terminator() {
        let mut bytes = vec![0u8; DBASE2_HEADER_LENGTH];
        bytes[0] = 0x02;
        bytes[1..3].copy_from_slice(&3u16.to_le_bytes());
        bytes[3] = 12;
        bytes[4] = 31;
        bytes[5] = 84;
        bytes[6..8].copy_from_slice(&6u16.to_le_bytes());
        bytes[8..10].copy_from_slice(b"ID");
        bytes[19] = b'N';
        bytes[20] = 5;
        bytes[24] = FIELD_TERMINATOR;

        let mut cursor = BinaryCursor::new(&bytes);
        cursor.skip(1).unwrap();
        let mut notifications = NotificationCollection::new();
        let header = HeaderLayout::DBase2
            .read_header(&mut cursor, DbfVersion::FoxBase, options(), &mut notifications)
            .unwrap();
        assert_eq!(header.record_count, 3);
        assert_eq!(
            header.last_update,
            LastUpdate {
                year: 1984,
                month: 12,
                day: 31
            }
        );
        assert_eq!(header.fields.len(), 1);
        assert_eq!(header.fields[0].name, "ID");
        assert!(header.terminated);
        assert!(notifications.is_empty());
        assert_eq!(cursor.position(), DBASE2_HEADER_LENGTH);
    }
}
