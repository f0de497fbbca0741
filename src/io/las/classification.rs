//! Bit-packed return and classification fields of point records.
//!
//! Formats 0-5 (one byte each, read MSB first):
//!
//! ```text
//! returns:        edge(1) scan_direction(1) number_of_returns(3) return_number(3)
//! classification: withheld(1) key_point(1) synthetic(1) class(5)
//! ```
//!
//! Formats 6-10 (two bytes, then a full class byte):
//!
//! ```text
//! byte 0: number_of_returns(4) return_number(4)
//! byte 1: edge(1) scan_direction(1) scanner_channel(2)
//!         overlap(1) withheld(1) key_point(1) synthetic(1)
//! byte 2: class(8)
//! ```

use crate::error::Result;
use crate::io::cursor::BinaryCursor;

/// Return numbering and scanner state of one pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReturnInfo {
    pub return_number: u8,
    pub number_of_returns: u8,
    /// Positive scan direction.
    pub scan_direction: bool,
    pub edge_of_flight_line: bool,
    /// Always 0 for formats 0-5.
    pub scanner_channel: u8,
}

/// Class code plus status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub class: u8,
    pub synthetic: bool,
    pub key_point: bool,
    pub withheld: bool,
    /// Only encoded by formats 6-10.
    pub overlap: bool,
}

impl ReturnInfo {
    pub fn read_legacy(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let edge_of_flight_line = cursor.read_bit()?;
        let scan_direction = cursor.read_bit()?;
        let number_of_returns = cursor.read_bits(3)? as u8;
        let return_number = cursor.read_bits(3)? as u8;
        Ok(Self {
            return_number,
            number_of_returns,
            scan_direction,
            edge_of_flight_line,
            scanner_channel: 0,
        })
    }

    pub fn to_legacy_byte(&self) -> u8 {
        (self.edge_of_flight_line as u8) << 7
            | (self.scan_direction as u8) << 6
            | (self.number_of_returns & 0x07) << 3
            | (self.return_number & 0x07)
    }
}

impl Classification {
    pub fn read_legacy(cursor: &mut BinaryCursor<'_>) -> Result<Self> {
        let withheld = cursor.read_bit()?;
        let key_point = cursor.read_bit()?;
        let synthetic = cursor.read_bit()?;
        let class = cursor.read_bits(5)? as u8;
        Ok(Self {
            class,
            synthetic,
            key_point,
            withheld,
            overlap: false,
        })
    }

    /// Decode a standalone legacy classification byte.
    pub fn from_legacy_byte(byte: u8) -> Self {
        let bytes = [byte];
        let mut cursor = BinaryCursor::new(&bytes);
        // a single in-bounds byte cannot fail
        Self::read_legacy(&mut cursor).unwrap_or_default()
    }

    pub fn to_legacy_byte(&self) -> u8 {
        (self.withheld as u8) << 7
            | (self.key_point as u8) << 6
            | (self.synthetic as u8) << 5
            | (self.class & 0x1F)
    }
}

/// Read the three bit-field bytes of formats 6-10.
pub fn read_extended(cursor: &mut BinaryCursor<'_>) -> Result<(ReturnInfo, Classification)> {
    let number_of_returns = cursor.read_bits(4)? as u8;
    let return_number = cursor.read_bits(4)? as u8;

    let edge_of_flight_line = cursor.read_bit()?;
    let scan_direction = cursor.read_bit()?;
    let scanner_channel = cursor.read_bits(2)? as u8;
    let overlap = cursor.read_bit()?;
    let withheld = cursor.read_bit()?;
    let key_point = cursor.read_bit()?;
    let synthetic = cursor.read_bit()?;

    let class = cursor.read_u8()?;

    Ok((
        ReturnInfo {
            return_number,
            number_of_returns,
            scan_direction,
            edge_of_flight_line,
            scanner_channel,
        },
        Classification {
            class,
            synthetic,
            key_point,
            withheld,
            overlap,
        },
    ))
}
