//! LAS reader.
//!
//! # Usage
//!
//! ```rust,ignore
//! use geodecode::io::las::LasReader;
//!
//! let file = LasReader::from_bytes(&bytes).read()?;
//! for batch in &file.points {
//!     for (position, color) in batch.positions.iter().zip(&batch.colors) {
//!         println!("{} {}", position, color);
//!     }
//! }
//! ```

use crate::error::{DecodeError, Result};
use crate::io::cursor::BinaryCursor;
use crate::notification::{NotificationCollection, NotificationType};

use super::batch::{build_batches, max_intensity, BatchTransform, PointBatch, POINT_BATCH_SIZE};
use super::header::LasHeader;
use super::point::PointRecord;
use super::vlr::VariableLengthRecord;

/// Configuration options for the LAS reader.
#[derive(Debug, Clone)]
pub struct LasReaderConfiguration {
    /// Maximum points per emitted batch.
    pub batch_size: usize,
    /// Add the header offsets to scaled positions.
    pub apply_offset: bool,
}

impl Default for LasReaderConfiguration {
    fn default() -> Self {
        Self {
            batch_size: POINT_BATCH_SIZE,
            apply_offset: false,
        }
    }
}

/// A decoded LAS file.
#[derive(Debug, Clone, PartialEq)]
pub struct LasFile {
    pub header: LasHeader,
    pub variable_length_records: Vec<VariableLengthRecord>,
    /// LAS 1.4 only.
    pub extended_variable_length_records: Vec<VariableLengthRecord>,
    pub points: Vec<PointBatch>,
    pub notifications: NotificationCollection,
}

impl LasFile {
    /// Total number of decoded points across all batches.
    pub fn point_count(&self) -> usize {
        self.points.iter().map(PointBatch::len).sum()
    }
}

/// LAS reader over an in-memory buffer.
pub struct LasReader<'a> {
    data: &'a [u8],
    config: LasReaderConfiguration,
}

impl<'a> LasReader<'a> {
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self {
            data,
            config: LasReaderConfiguration::default(),
        }
    }

    pub fn with_config(mut self, config: LasReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Decode the header, VLRs, points and (for 1.4) EVLRs.
    pub fn read(self) -> Result<LasFile> {
        let mut cursor = BinaryCursor::new(self.data);
        let mut notifications = NotificationCollection::new();

        let header = LasHeader::read(&mut cursor)?;
        let common = header.common();
        log::debug!(
            "LAS {} with {} point(s) of {}, {}",
            header.version(),
            header.point_count(),
            common.point_format,
            common.bounds
        );

        let header_size = common.header_size as usize;
        if header_size < cursor.position() {
            notifications.notify(
                NotificationType::Warning,
                94,
                format!(
                    "Header size {} is smaller than the {} {} header",
                    header_size,
                    cursor.position(),
                    header.version()
                ),
            );
        } else {
            cursor.seek(header_size)?;
        }

        let mut variable_length_records =
            Vec::with_capacity(common.number_of_variable_length_records.min(1024) as usize);
        for _ in 0..common.number_of_variable_length_records {
            variable_length_records.push(VariableLengthRecord::read(
                &mut cursor,
                &mut notifications,
            )?);
        }

        let point_offset = common.offset_to_point_data as usize;
        if point_offset < cursor.position() {
            notifications.notify(
                NotificationType::Warning,
                96,
                format!(
                    "Point data offset {} overlaps header or VLRs ending at {}",
                    point_offset,
                    cursor.position()
                ),
            );
        }
        cursor.seek(point_offset)?;

        let records = read_points(&mut cursor, &header)?;

        let mut extended_variable_length_records = Vec::new();
        if let Some(extended) = header.extended() {
            if extended.number_of_evlrs > 0 {
                let start = usize::try_from(extended.start_of_first_evlr)
                    .map_err(|_| out_of_bounds(&cursor, extended.start_of_first_evlr))?;
                cursor.seek(start)?;
                for _ in 0..extended.number_of_evlrs {
                    extended_variable_length_records.push(
                        VariableLengthRecord::read_extended(&mut cursor, &mut notifications)?,
                    );
                }
            }
        }

        let transform = BatchTransform {
            scale: common.scale,
            offset: self.config.apply_offset.then_some(common.offset),
            max_intensity: max_intensity(&records),
        };
        let points = build_batches(records, transform, self.config.batch_size);

        Ok(LasFile {
            header,
            variable_length_records,
            extended_variable_length_records,
            points,
            notifications,
        })
    }
}

fn out_of_bounds(cursor: &BinaryCursor<'_>, requested: u64) -> DecodeError {
    DecodeError::OutOfBounds {
        offset: cursor.position(),
        requested: usize::try_from(requested).unwrap_or(usize::MAX),
        length: cursor.len(),
    }
}

/// Read the version-mandated number of point records.
fn read_points(cursor: &mut BinaryCursor<'_>, header: &LasHeader) -> Result<Vec<PointRecord>> {
    let common = header.common();
    let format = common.point_format;
    let record_length = common.point_record_length as usize;
    if record_length < format.record_length() as usize {
        return Err(DecodeError::InvalidFormat(format!(
            "point record length {} is shorter than the {} bytes of {}",
            record_length,
            format.record_length(),
            format
        )));
    }

    let count = header.point_count();
    let total = count.saturating_mul(record_length as u64);
    if total > cursor.remaining() as u64 {
        return Err(out_of_bounds(cursor, total));
    }
    let count = count as usize;

    log::debug!(
        "Reading {} point(s) of {} ({} byte records)",
        count,
        format,
        record_length
    );

    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let start = cursor.position();
        records.push(PointRecord::read(cursor, format)?);
        // extra bytes
        cursor.seek(start + record_length)?;
    }
    Ok(records)
}

/// Decode a complete `.las` buffer with the default configuration.
pub fn decode(data: &[u8]) -> Result<LasFile> {
    LasReader::from_bytes(data).read()
}
