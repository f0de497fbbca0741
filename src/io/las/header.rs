//! LAS public header block, one layout per version.
//!
//! All layouts share the prefix up to the bounding box; bytes 4..8 and
//! the trailing fields differ:
//!
//! | version | bytes 4..8                        | trailer                         |
//! |---------|-----------------------------------|---------------------------------|
//! | 1.0     | reserved                          | none                            |
//! | 1.1     | file source id, reserved          | none                            |
//! | 1.2     | file source id, global encoding   | none                            |
//! | 1.3     | file source id, global encoding   | waveform data start             |
//! | 1.4     | file source id, global encoding   | waveform, EVLRs, 64-bit counts  |

use crate::error::{DecodeError, Result};
use crate::io::cursor::BinaryCursor;
use crate::types::{BoundingBox3D, Vector3};

use super::global_encoding::GlobalEncoding;
use super::point::PointFormat;
use super::version::LasVersion;

/// File signature at offset 0.
pub const SIGNATURE: &[u8; 4] = b"LASF";

/// Offset of the (major, minor) version bytes.
const VERSION_OFFSET: usize = 24;
/// Offset of the point data format byte.
const POINT_FORMAT_OFFSET: usize = 104;

/// Fields every header layout carries.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCommon {
    pub project_id: [u8; 16],
    pub system_identifier: String,
    pub generating_software: String,
    pub creation_day_of_year: u16,
    pub creation_year: u16,
    pub header_size: u16,
    pub offset_to_point_data: u32,
    pub number_of_variable_length_records: u32,
    pub point_format: PointFormat,
    pub point_record_length: u16,
    /// Legacy 32-bit point count.
    pub legacy_point_count: u32,
    pub legacy_points_by_return: [u32; 5],
    pub scale: Vector3,
    pub offset: Vector3,
    pub bounds: BoundingBox3D,
}

/// 1.4 additions after the waveform pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedCounts {
    pub start_of_first_evlr: u64,
    pub number_of_evlrs: u32,
    pub point_count: u64,
    pub points_by_return: [u64; 15],
}

/// Decoded public header.
#[derive(Debug, Clone, PartialEq)]
pub enum LasHeader {
    V1_0(HeaderCommon),
    V1_1 {
        common: HeaderCommon,
        file_source_id: u16,
    },
    V1_2 {
        common: HeaderCommon,
        file_source_id: u16,
        global_encoding: GlobalEncoding,
    },
    V1_3 {
        common: HeaderCommon,
        file_source_id: u16,
        global_encoding: GlobalEncoding,
        start_of_waveform_data: u64,
    },
    V1_4 {
        common: HeaderCommon,
        file_source_id: u16,
        global_encoding: GlobalEncoding,
        start_of_waveform_data: u64,
        extended: ExtendedCounts,
    },
}

impl LasHeader {
    /// Validate the signature, peek the version and read the matching layout.
    pub fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let signature = cursor.read_array::<4>()?;
        if &signature != SIGNATURE {
            return Err(DecodeError::InvalidSignature {
                expected: String::from_utf8_lossy(SIGNATURE).into_owned(),
                found: String::from_utf8_lossy(&signature).into_owned(),
            });
        }

        let major = cursor.peek_u8_at(VERSION_OFFSET)?;
        let minor = cursor.peek_u8_at(VERSION_OFFSET + 1)?;
        let version = LasVersion::from_pair(major, minor)
            .ok_or(DecodeError::UnsupportedVersion { major, minor })?;
        log::debug!("LAS {} header", version);

        let header = match version {
            LasVersion::V1_0 => {
                cursor.skip(4)?;
                LasHeader::V1_0(HeaderCommon::read(cursor)?)
            }
            LasVersion::V1_1 => {
                let file_source_id = cursor.read_u16()?;
                cursor.skip(2)?;
                LasHeader::V1_1 {
                    common: HeaderCommon::read(cursor)?,
                    file_source_id,
                }
            }
            LasVersion::V1_2 => {
                let file_source_id = cursor.read_u16()?;
                let global_encoding = GlobalEncoding::read(cursor, version)?;
                LasHeader::V1_2 {
                    common: HeaderCommon::read(cursor)?,
                    file_source_id,
                    global_encoding,
                }
            }
            LasVersion::V1_3 => {
                let file_source_id = cursor.read_u16()?;
                let global_encoding = GlobalEncoding::read(cursor, version)?;
                let common = HeaderCommon::read(cursor)?;
                LasHeader::V1_3 {
                    common,
                    file_source_id,
                    global_encoding,
                    start_of_waveform_data: cursor.read_u64()?,
                }
            }
            LasVersion::V1_4 => {
                let file_source_id = cursor.read_u16()?;
                let global_encoding = GlobalEncoding::read(cursor, version)?;
                let common = HeaderCommon::read(cursor)?;
                let start_of_waveform_data = cursor.read_u64()?;
                let start_of_first_evlr = cursor.read_u64()?;
                let number_of_evlrs = cursor.read_u32()?;
                let point_count = cursor.read_u64()?;
                let mut points_by_return = [0u64; 15];
                for count in points_by_return.iter_mut() {
                    *count = cursor.read_u64()?;
                }
                LasHeader::V1_4 {
                    common,
                    file_source_id,
                    global_encoding,
                    start_of_waveform_data,
                    extended: ExtendedCounts {
                        start_of_first_evlr,
                        number_of_evlrs,
                        point_count,
                        points_by_return,
                    },
                }
            }
        };
        Ok(header)
    }

    pub fn version(&self) -> LasVersion {
        match self {
            LasHeader::V1_0(_) => LasVersion::V1_0,
            LasHeader::V1_1 { .. } => LasVersion::V1_1,
            LasHeader::V1_2 { .. } => LasVersion::V1_2,
            LasHeader::V1_3 { .. } => LasVersion::V1_3,
            LasHeader::V1_4 { .. } => LasVersion::V1_4,
        }
    }

    pub fn common(&self) -> &HeaderCommon {
        match self {
            LasHeader::V1_0(common)
            | LasHeader::V1_1 { common, .. }
            | LasHeader::V1_2 { common, .. }
            | LasHeader::V1_3 { common, .. }
            | LasHeader::V1_4 { common, .. } => common,
        }
    }

    /// `None` for 1.0, which reserves those bytes.
    pub fn file_source_id(&self) -> Option<u16> {
        match self {
            LasHeader::V1_0(_) => None,
            LasHeader::V1_1 { file_source_id, .. }
            | LasHeader::V1_2 { file_source_id, .. }
            | LasHeader::V1_3 { file_source_id, .. }
            | LasHeader::V1_4 { file_source_id, .. } => Some(*file_source_id),
        }
    }

    pub fn global_encoding(&self) -> Option<GlobalEncoding> {
        match self {
            LasHeader::V1_0(_) | LasHeader::V1_1 { .. } => None,
            LasHeader::V1_2 {
                global_encoding, ..
            }
            | LasHeader::V1_3 {
                global_encoding, ..
            }
            | LasHeader::V1_4 {
                global_encoding, ..
            } => Some(*global_encoding),
        }
    }

    /// Offset of the internal waveform data packet record, 1.3 and later.
    pub fn start_of_waveform_data(&self) -> Option<u64> {
        match self {
            LasHeader::V1_3 {
                start_of_waveform_data,
                ..
            }
            | LasHeader::V1_4 {
                start_of_waveform_data,
                ..
            } => Some(*start_of_waveform_data),
            _ => None,
        }
    }

    pub fn extended(&self) -> Option<&ExtendedCounts> {
        match self {
            LasHeader::V1_4 { extended, .. } => Some(extended),
            _ => None,
        }
    }

    /// Number of point records, from the field the version mandates.
    pub fn point_count(&self) -> u64 {
        match self {
            LasHeader::V1_4 { extended, .. } => extended.point_count,
            _ => self.common().legacy_point_count as u64,
        }
    }

    pub fn point_format(&self) -> PointFormat {
        self.common().point_format
    }
}

impl HeaderCommon {
    /// Read from the project id through the bounding box (bytes 8..227).
    fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let project_id = cursor.read_array::<16>()?;
        // version bytes, already peeked
        cursor.skip(2)?;
        let system_identifier = read_fixed_text(cursor, 32)?;
        let generating_software = read_fixed_text(cursor, 32)?;
        let creation_day_of_year = cursor.read_u16()?;
        let creation_year = cursor.read_u16()?;
        let header_size = cursor.read_u16()?;
        let offset_to_point_data = cursor.read_u32()?;
        let number_of_variable_length_records = cursor.read_u32()?;
        let point_format = PointFormat::from_code(cursor.read_u8()?, POINT_FORMAT_OFFSET)?;
        let point_record_length = cursor.read_u16()?;
        let legacy_point_count = cursor.read_u32()?;
        let mut legacy_points_by_return = [0u32; 5];
        for count in legacy_points_by_return.iter_mut() {
            *count = cursor.read_u32()?;
        }

        let scale = read_vector3(cursor)?;
        let offset = read_vector3(cursor)?;
        let max_x = cursor.read_f64()?;
        let min_x = cursor.read_f64()?;
        let max_y = cursor.read_f64()?;
        let min_y = cursor.read_f64()?;
        let max_z = cursor.read_f64()?;
        let min_z = cursor.read_f64()?;

        Ok(Self {
            project_id,
            system_identifier,
            generating_software,
            creation_day_of_year,
            creation_year,
            header_size,
            offset_to_point_data,
            number_of_variable_length_records,
            point_format,
            point_record_length,
            legacy_point_count,
            legacy_points_by_return,
            scale,
            offset,
            bounds: BoundingBox3D::new(
                Vector3::new(min_x, min_y, min_z),
                Vector3::new(max_x, max_y, max_z),
            ),
        })
    }
}

fn read_vector3(cursor: &mut BinaryCursor<'_>) -> Result<Vector3> {
    Ok(Vector3::new(
        cursor.read_f64()?,
        cursor.read_f64()?,
        cursor.read_f64()?,
    ))
}

/// NUL-terminated text in a fixed-width slot, trailing spaces trimmed.
pub(crate) fn read_fixed_text(cursor: &mut BinaryCursor<'_>, length: usize) -> Result<String> {
    let text = cursor.read_string(length)?;
    let text = text.split('\0').next().unwrap_or_default();
    Ok(text.trim_end().to_string())
}
