//! Shapefile reader.
//!
//! # Usage
//!
//! ```rust,ignore
//! use geodecode::io::shp::ShpReader;
//!
//! let file = ShpReader::from_bytes(&bytes).read()?;
//! println!("{} shape(s) of type {}", file.records.len(), file.header.shape_type);
//! ```

use crate::error::{DecodeError, Result};
use crate::io::cursor::{BinaryCursor, Endianness};
use crate::notification::{NotificationCollection, NotificationType};

use super::header::ShpHeader;
use super::record::ShapeRecord;
use super::shape_type::ShapeType;

/// Bytes of the big-endian record header (number + content length).
const RECORD_HEADER_LENGTH: usize = 8;

/// Configuration options for the shapefile reader.
#[derive(Debug, Clone, Default)]
pub struct ShpReaderConfiguration {
    /// Turn record-level failures into warnings and keep going.
    ///
    /// Header failures are always fatal.
    pub failsafe: bool,
}

/// A decoded shapefile.
#[derive(Debug, Clone, PartialEq)]
pub struct ShpFile {
    pub header: ShpHeader,
    /// Records in file order, null shapes included.
    pub records: Vec<ShapeRecord>,
    pub notifications: NotificationCollection,
}

/// Shapefile reader over an in-memory buffer.
pub struct ShpReader<'a> {
    data: &'a [u8],
    config: ShpReaderConfiguration,
}

impl<'a> ShpReader<'a> {
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self {
            data,
            config: ShpReaderConfiguration::default(),
        }
    }

    pub fn with_config(mut self, config: ShpReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Decode the header and all records.
    pub fn read(self) -> Result<ShpFile> {
        let mut cursor = BinaryCursor::with_endianness(self.data, Endianness::Big);
        let mut notifications = NotificationCollection::new();

        let header = ShpHeader::read(&mut cursor, &mut notifications)?;
        if header.file_length_bytes() != cursor.len() {
            notifications.notify(
                NotificationType::Warning,
                24,
                format!(
                    "Declared file length {} differs from buffer length {}",
                    header.file_length_bytes(),
                    cursor.len()
                ),
            );
        }

        let records = self.read_records(&mut cursor, &header, &mut notifications)?;
        log::debug!("Decoded {} shape record(s)", records.len());

        Ok(ShpFile {
            header,
            records,
            notifications,
        })
    }

    fn read_records(
        &self,
        cursor: &mut BinaryCursor<'_>,
        header: &ShpHeader,
        notifications: &mut NotificationCollection,
    ) -> Result<Vec<ShapeRecord>> {
        let mut records = Vec::new();

        while !cursor.is_end_of_file() {
            let record_start = cursor.position();
            if self.config.failsafe && cursor.remaining() < RECORD_HEADER_LENGTH {
                notifications.notify(
                    NotificationType::Warning,
                    record_start,
                    format!("{} trailing byte(s) ignored", cursor.remaining()),
                );
                break;
            }

            cursor.set_endianness(Endianness::Big);
            let number = cursor.read_i32()?;
            let words = cursor.read_i32()?;
            cursor.set_endianness(Endianness::Little);
            let content_start = cursor.position();
            let end = content_start.saturating_add(words.max(0) as usize * 2);

            let result = if words < 0 {
                Err(DecodeError::InvalidFormat(format!(
                    "record {} has negative content length {}",
                    number, words
                )))
            } else {
                read_record(cursor, header, number, end, notifications)
            };

            match result {
                Ok(record) => records.push(record),
                Err(err) if self.config.failsafe => {
                    notifications.notify(
                        NotificationType::Warning,
                        record_start,
                        format!("Record {} skipped: {}", number, err),
                    );
                    if words < 0 || end > cursor.len() {
                        break;
                    }
                    cursor.seek(end)?;
                }
                Err(err) => return Err(err),
            }
        }

        Ok(records)
    }
}

/// Decode one record's content and leave the cursor at `end`.
fn read_record(
    cursor: &mut BinaryCursor<'_>,
    header: &ShpHeader,
    number: i32,
    end: usize,
    notifications: &mut NotificationCollection,
) -> Result<ShapeRecord> {
    let content_start = cursor.position();
    let code = cursor.read_i32()?;
    let shape_type = ShapeType::from_code(code).ok_or(DecodeError::InvalidShapeType {
        offset: content_start,
        found: code,
    })?;

    if shape_type != ShapeType::Null && shape_type != header.shape_type {
        notifications.notify(
            NotificationType::Warning,
            content_start,
            format!(
                "Record {} is {} but the file declares {}",
                number, shape_type, header.shape_type
            ),
        );
    }

    let record = ShapeRecord::read(cursor, shape_type, end)?;
    if matches!(record, ShapeRecord::MultiPatch) {
        notifications.notify(
            NotificationType::NotImplemented,
            content_start,
            format!("Record {}: multipatch content not decoded", number),
        );
    }

    if cursor.position() > end {
        notifications.notify(
            NotificationType::Warning,
            content_start,
            format!(
                "Record {} content overruns its declared length by {} byte(s)",
                number,
                cursor.position() - end
            ),
        );
    }
    cursor.seek(end)?;
    Ok(record)
}

/// Decode a complete `.shp` buffer with the default configuration.
pub fn decode(data: &[u8]) -> Result<ShpFile> {
    ShpReader::from_bytes(data).read()
}
