//! Global encoding bit field (LAS 1.2+).
//!
//! Stored as a little-endian u16 at byte 6 of the header. Only the low byte
//! carries flags:
//!
//! ```text
//! bit  7 6 5 | 4   | 3         | 2        | 1        | 0
//!      reserved| wkt | synthetic | external | internal | gps
//! ```
//!
//! The flags are read most significant bit first, so the struct is filled
//! from `wkt` down to `gps_time`. The high byte is reserved.

use crate::error::Result;
use crate::io::cursor::BinaryCursor;

use super::version::LasVersion;

/// Meaning of the per-point GPS time field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpsTimeType {
    /// Seconds into the GPS week.
    #[default]
    WeekTime,
    /// Adjusted standard GPS time (satellite GPS time minus 1e9).
    StandardTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlobalEncoding {
    pub gps_time_type: GpsTimeType,
    /// Waveform packets stored inside this file (1.3+).
    pub waveform_internal: bool,
    /// Waveform packets stored in an auxiliary file (1.3+).
    pub waveform_external: bool,
    /// Return numbers were generated synthetically (1.3+).
    pub synthetic_return_numbers: bool,
    /// Coordinate system stored as WKT rather than GeoTIFF keys (1.4).
    pub wkt: bool,
}

impl GlobalEncoding {
    /// Read the two-byte word. Flags the version does not define stay unset.
    pub fn read(cursor: &mut BinaryCursor<'_>, version: LasVersion) -> Result<Self> {
        cursor.read_bits(3)?;
        let wkt = cursor.read_bit()?;
        let synthetic = cursor.read_bit()?;
        let external = cursor.read_bit()?;
        let internal = cursor.read_bit()?;
        let gps = cursor.read_bit()?;
        // reserved high byte
        cursor.skip(1)?;

        let waveform_flags = version >= LasVersion::V1_3;
        Ok(Self {
            gps_time_type: if gps {
                GpsTimeType::StandardTime
            } else {
                GpsTimeType::WeekTime
            },
            waveform_internal: waveform_flags && internal,
            waveform_external: waveform_flags && external,
            synthetic_return_numbers: waveform_flags && synthetic,
            wkt: version == LasVersion::V1_4 && wkt,
        })
    }

    /// Pack the flags back into the low byte of the word.
    pub fn bits(&self) -> u16 {
        (self.gps_time_type == GpsTimeType::StandardTime) as u16
            | (self.waveform_internal as u16) << 1
            | (self.waveform_external as u16) << 2
            | (self.synthetic_return_numbers as u16) << 3
            | (self.wkt as u16) << 4
    }
}
