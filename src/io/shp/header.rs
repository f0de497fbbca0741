//! Fixed 100-byte shapefile header.

use crate::error::{DecodeError, Result};
use crate::io::cursor::{BinaryCursor, Endianness};
use crate::notification::{NotificationCollection, NotificationType};
use crate::types::{BoundingBox2D, ValueRange, Vector2};

use super::shape_type::ShapeType;

/// Big-endian file code every shapefile starts with.
pub const FILE_CODE: i32 = 9994;
/// Header size, also the smallest valid file.
pub const HEADER_LENGTH: usize = 100;
/// Lowest format version known to decode correctly.
pub const MINIMUM_VERSION: i32 = 1000;

/// Decoded shapefile header.
#[derive(Debug, Clone, PartialEq)]
pub struct ShpHeader {
    pub file_code: i32,
    /// Declared file length in 16-bit words.
    pub file_length: i32,
    pub version: i32,
    pub shape_type: ShapeType,
    pub bbox: BoundingBox2D,
    pub z_range: ValueRange,
    pub m_range: ValueRange,
}

impl ShpHeader {
    /// Declared file length in bytes.
    pub fn file_length_bytes(&self) -> usize {
        self.file_length.max(0) as usize * 2
    }

    /// Read and validate the header.
    ///
    /// Checks run in order: file code, minimum length, shape type, version.
    /// Only the version check is recoverable.
    pub fn read(
        cursor: &mut BinaryCursor<'_>,
        notifications: &mut NotificationCollection,
    ) -> Result<Self> {
        cursor.set_endianness(Endianness::Big);
        let file_code = cursor.read_i32()?;
        if file_code != FILE_CODE {
            return Err(DecodeError::InvalidFileCode {
                expected: FILE_CODE,
                found: file_code,
            });
        }

        if cursor.len() < HEADER_LENGTH {
            return Err(DecodeError::InvalidFileLength {
                minimum: HEADER_LENGTH,
                found: cursor.len(),
            });
        }
        // five unused big-endian integers
        cursor.skip(20)?;
        let file_length = cursor.read_i32()?;
        if (file_length.max(0) as usize) * 2 < HEADER_LENGTH {
            return Err(DecodeError::InvalidFileLength {
                minimum: HEADER_LENGTH,
                found: file_length.max(0) as usize * 2,
            });
        }

        cursor.set_endianness(Endianness::Little);
        let version = cursor.read_i32()?;
        let shape_type_offset = cursor.position();
        let code = cursor.read_i32()?;
        let shape_type = ShapeType::from_code(code).ok_or(DecodeError::InvalidShapeType {
            offset: shape_type_offset,
            found: code,
        })?;
        if version < MINIMUM_VERSION {
            notifications.notify(
                NotificationType::Warning,
                shape_type_offset - 4,
                format!(
                    "Shapefile version {} is below {}, decoding anyway",
                    version, MINIMUM_VERSION
                ),
            );
        }

        let min = Vector2::new(cursor.read_f64()?, cursor.read_f64()?);
        let max = Vector2::new(cursor.read_f64()?, cursor.read_f64()?);
        let z_range = ValueRange::new(cursor.read_f64()?, cursor.read_f64()?);
        let m_range = ValueRange::new(cursor.read_f64()?, cursor.read_f64()?);
        let bbox = BoundingBox2D::new(min, max);

        log::debug!(
            "Shapefile header: {} v{}, {} bytes declared, {}",
            shape_type,
            version,
            file_length as i64 * 2,
            bbox
        );

        Ok(Self {
            file_code,
            file_length,
            version,
            shape_type,
            bbox,
            z_range,
            m_range,
        })
    }
}
