//! Point data record formats 0-10.

use std::fmt;

use crate::error::{DecodeError, Result};
use crate::io::cursor::BinaryCursor;

use super::classification::{read_extended, Classification, ReturnInfo};

/// Compressed (LAZ) writers set one of the two high bits of the format byte.
const COMPRESSION_BITS: u8 = 0xC0;

/// Point data record format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointFormat {
    Format0,
    Format1,
    Format2,
    Format3,
    Format4,
    Format5,
    Format6,
    Format7,
    Format8,
    Format9,
    Format10,
}

/// Optional blocks present in a format, in on-disk order after the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointLayout {
    /// Formats 6-10 base with 16-bit scan angle and GPS time.
    pub extended: bool,
    pub gps_time: bool,
    pub rgb: bool,
    pub nir: bool,
    pub waveform: bool,
}

impl PointLayout {
    const fn new(extended: bool, gps_time: bool, rgb: bool, nir: bool, waveform: bool) -> Self {
        Self {
            extended,
            gps_time,
            rgb,
            nir,
            waveform,
        }
    }

    /// Bytes a record of this layout occupies.
    pub fn length(&self) -> u16 {
        let mut length = if self.extended { 30 } else { 20 };
        if self.gps_time && !self.extended {
            length += 8;
        }
        if self.rgb {
            length += 6;
        }
        if self.nir {
            length += 2;
        }
        if self.waveform {
            length += WAVE_PACKET_LENGTH;
        }
        length
    }
}

const WAVE_PACKET_LENGTH: u16 = 29;

impl PointFormat {
    /// Decode a header format byte. Compressed or unknown formats fail.
    pub fn from_code(code: u8, offset: usize) -> Result<Self> {
        let unsupported = DecodeError::UnsupportedPointFormat {
            offset,
            found: code,
        };
        if code & COMPRESSION_BITS != 0 {
            return Err(unsupported);
        }
        Ok(match code {
            0 => Self::Format0,
            1 => Self::Format1,
            2 => Self::Format2,
            3 => Self::Format3,
            4 => Self::Format4,
            5 => Self::Format5,
            6 => Self::Format6,
            7 => Self::Format7,
            8 => Self::Format8,
            9 => Self::Format9,
            10 => Self::Format10,
            _ => return Err(unsupported),
        })
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn layout(self) -> PointLayout {
        match self {
            Self::Format0 => PointLayout::new(false, false, false, false, false),
            Self::Format1 => PointLayout::new(false, true, false, false, false),
            Self::Format2 => PointLayout::new(false, false, true, false, false),
            Self::Format3 => PointLayout::new(false, true, true, false, false),
            Self::Format4 => PointLayout::new(false, true, false, false, true),
            Self::Format5 => PointLayout::new(false, true, true, false, true),
            Self::Format6 => PointLayout::new(true, true, false, false, false),
            Self::Format7 => PointLayout::new(true, true, true, false, false),
            Self::Format8 => PointLayout::new(true, true, true, true, false),
            Self::Format9 => PointLayout::new(true, true, false, false, true),
            Self::Format10 => PointLayout::new(true, true, true, true, true),
        }
    }

    /// Minimum record length for this format.
    pub fn record_length(self) -> u16 {
        self.layout().length()
    }
}

impl fmt::Display for PointFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point format {}", self.code())
    }
}

/// Scan angle as stored by the format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScanAngle {
    /// Whole degrees, formats 0-5.
    Rank(i8),
    /// 0.006 degree increments, formats 6-10.
    Scaled(i16),
}

impl ScanAngle {
    pub fn degrees(&self) -> f32 {
        match *self {
            ScanAngle::Rank(rank) => rank as f32,
            ScanAngle::Scaled(value) => value as f32 * 0.006,
        }
    }
}

impl Default for ScanAngle {
    fn default() -> Self {
        ScanAngle::Rank(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb16 {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

/// Waveform packet pointer and return location.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WavePacket {
    pub descriptor_index: u8,
    pub byte_offset: u64,
    pub packet_size: u32,
    /// Picoseconds from the first digitized sample.
    pub return_point_location: f32,
    pub x_t: f32,
    pub y_t: f32,
    pub z_t: f32,
}

impl WavePacket {
    fn read(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        Ok(Self {
            descriptor_index: cursor.read_u8()?,
            byte_offset: cursor.read_u64()?,
            packet_size: cursor.read_u32()?,
            return_point_location: cursor.read_f32()?,
            x_t: cursor.read_f32()?,
            y_t: cursor.read_f32()?,
            z_t: cursor.read_f32()?,
        })
    }
}

/// One decoded point record. Coordinates are the raw scaled integers.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub format: PointFormat,
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub intensity: u16,
    pub returns: ReturnInfo,
    pub classification: Classification,
    pub scan_angle: ScanAngle,
    pub user_data: u8,
    pub point_source_id: u16,
    pub gps_time: Option<f64>,
    pub color: Option<Rgb16>,
    pub nir: Option<u16>,
    pub wave_packet: Option<WavePacket>,
}

impl PointRecord {
    /// Read exactly `format.record_length()` bytes.
    pub fn read(cursor: &mut BinaryCursor<'_>, format: PointFormat) -> Result<Self> {
        let layout = format.layout();
        let x = cursor.read_i32()?;
        let y = cursor.read_i32()?;
        let z = cursor.read_i32()?;
        let intensity = cursor.read_u16()?;

        let (returns, classification, scan_angle, user_data, point_source_id, gps_time) =
            if layout.extended {
                let (returns, classification) = read_extended(cursor)?;
                let user_data = cursor.read_u8()?;
                let scan_angle = ScanAngle::Scaled(cursor.read_i16()?);
                let point_source_id = cursor.read_u16()?;
                let gps_time = cursor.read_f64()?;
                (returns, classification, scan_angle, user_data, point_source_id, Some(gps_time))
            } else {
                let returns = ReturnInfo::read_legacy(cursor)?;
                let classification = Classification::read_legacy(cursor)?;
                let scan_angle = ScanAngle::Rank(cursor.read_i8()?);
                let user_data = cursor.read_u8()?;
                let point_source_id = cursor.read_u16()?;
                let gps_time = if layout.gps_time {
                    Some(cursor.read_f64()?)
                } else {
                    None
                };
                (returns, classification, scan_angle, user_data, point_source_id, gps_time)
            };

        let color = if layout.rgb {
            Some(Rgb16 {
                red: cursor.read_u16()?,
                green: cursor.read_u16()?,
                blue: cursor.read_u16()?,
            })
        } else {
            None
        };
        let nir = if layout.nir {
            Some(cursor.read_u16()?)
        } else {
            None
        };
        let wave_packet = if layout.waveform {
            Some(WavePacket::read(cursor)?)
        } else {
            None
        };

        Ok(Self {
            format,
            x,
            y,
            z,
            intensity,
            returns,
            classification,
            scan_angle,
            user_data,
            point_source_id,
            gps_time,
            color,
            nir,
            wave_packet,
        })
    }
}
