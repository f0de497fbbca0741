//! dBase table reader, the entry point for decoding `.dbf` buffers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use geodecode::io::dbf::DbfReader;
//!
//! let table = DbfReader::from_bytes(&bytes).read()?;
//! for record in &table.records {
//!     println!("{:?}", record.fields);
//! }
//! ```

use encoding_rs::Encoding;

use crate::error::{DecodeError, Result};
use crate::io::cursor::BinaryCursor;
use crate::notification::{NotificationCollection, NotificationType};

use super::header::{DbfHeader, HeaderOptions};
use super::record::{AttributeRecord, RECORD_DELETED, RECORD_VALID};
use super::version::DbfVersion;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration options for the dBase reader.
#[derive(Debug, Clone)]
pub struct DbfReaderConfiguration {
    /// Text encoding for names and character data.
    ///
    /// `None` picks the encoding from the header's language driver byte,
    /// falling back to Windows-1252.
    pub encoding: Option<&'static Encoding>,

    /// Trim surrounding whitespace from field names.
    pub trim_field_names: bool,
}

impl Default for DbfReaderConfiguration {
    fn default() -> Self {
        Self {
            encoding: None,
            trim_field_names: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Decoded file
// ---------------------------------------------------------------------------

/// A decoded dBase table.
#[derive(Debug, Clone, PartialEq)]
pub struct DbfFile {
    pub header: DbfHeader,
    /// One record per declared record, in file order.
    pub records: Vec<AttributeRecord>,
    /// Non-fatal defects found while decoding.
    pub notifications: NotificationCollection,
}

// ---------------------------------------------------------------------------
// DbfReader
// ---------------------------------------------------------------------------

/// dBase table reader over an in-memory buffer.
pub struct DbfReader<'a> {
    data: &'a [u8],
    config: DbfReaderConfiguration,
}

impl<'a> DbfReader<'a> {
    /// Create a reader over a complete `.dbf` buffer.
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self {
            data,
            config: DbfReaderConfiguration::default(),
        }
    }

    /// Set configuration options.
    pub fn with_config(mut self, config: DbfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Decode the header and every declared record.
    pub fn read(self) -> Result<DbfFile> {
        let mut cursor = BinaryCursor::new(self.data);
        let mut notifications = NotificationCollection::new();

        let code = cursor.read_u8()?;
        let version =
            DbfVersion::from_code(code).ok_or(DecodeError::InvalidVersion { offset: 0, found: code })?;

        let options = HeaderOptions {
            encoding: self.config.encoding,
            trim_field_names: self.config.trim_field_names,
        };
        let header = version
            .layout()
            .read_header(&mut cursor, version, options, &mut notifications)?;

        let records = read_records(&mut cursor, &header, &mut notifications)?;

        Ok(DbfFile {
            header,
            records,
            notifications,
        })
    }
}

fn read_records(
    cursor: &mut BinaryCursor<'_>,
    header: &DbfHeader,
    notifications: &mut NotificationCollection,
) -> Result<Vec<AttributeRecord>> {
    let record_length = header.record_length as usize;
    let mut records = Vec::with_capacity(header.record_count.min(1 << 20) as usize);

    for index in 0..header.record_count {
        let start = cursor.position();
        let (record, flag) = AttributeRecord::read(cursor, &header.fields)?;
        if flag != RECORD_VALID && flag != RECORD_DELETED {
            notifications.notify(
                NotificationType::Warning,
                start,
                format!("Record {} has unexpected deleted flag {:#04X}", index, flag),
            );
        }

        // honour the declared record length when the descriptors cover less
        let end = start + record_length;
        if record_length > 0 && end > cursor.position() && end <= cursor.len() {
            cursor.seek(end)?;
        }
        records.push(record);
    }

    log::debug!("Decoded {} dBase record(s)", records.len());
    Ok(records)
}

/// Decode a complete `.dbf` buffer with the default configuration.
pub fn decode(data: &[u8]) -> Result<DbfFile> {
    DbfReader::from_bytes(data).read()
}
