//! Variable-length records and their content decoders.
//!
//! Content is selected by `(user_id, record_id)`:
//!
//! - `LASF_Projection`: GeoTIFF key directory (34735), double (34736) and
//!   ASCII (34737) parameters; OGC math transform (2111) and coordinate
//!   system (2112) records are kept as placeholders.
//! - `LASF_Spec`: classification lookup (0) and text area description (3)
//!   are decoded; other ids below 100, waveform packet descriptors
//!   (100..355) and waveform data (65535) are placeholders.
//! - anything else is kept as an opaque blob.

use crate::error::{DecodeError, Result};
use crate::io::cursor::BinaryCursor;
use crate::notification::{NotificationCollection, NotificationType};

use super::header::read_fixed_text;

pub const PROJECTION_USER_ID: &str = "LASF_Projection";
pub const SPEC_USER_ID: &str = "LASF_Spec";

/// Sub-header sizes.
pub const VLR_HEADER_LENGTH: usize = 54;
pub const EVLR_HEADER_LENGTH: usize = 60;

/// One GeoTIFF key entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeoKeyEntry {
    pub key_id: u16,
    /// 0 for an inline value, else the tag holding it (34736 or 34737).
    pub tiff_tag_location: u16,
    pub count: u16,
    pub value_offset: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoKeyDirectory {
    pub key_directory_version: u16,
    pub key_revision: u16,
    pub minor_revision: u16,
    pub keys: Vec<GeoKeyEntry>,
}

/// One row of the 256-entry classification lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationEntry {
    pub class: u8,
    pub description: String,
}

/// Record kinds recognized but not decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    OgcMathTransform,
    OgcCoordinateSystem,
    Histogram,
    ExtraBytes,
    Superseded,
    /// Other `LASF_Spec` ids below 100.
    Reserved(u16),
    /// Descriptor index = record id - 99.
    WaveformPacketDescriptor(u16),
    WaveformData,
}

/// Decoded VLR content.
#[derive(Debug, Clone, PartialEq)]
pub enum VlrContent {
    GeoKeyDirectory(GeoKeyDirectory),
    GeoDoubleParams(Vec<f64>),
    GeoAsciiParams(String),
    ClassificationLookup(Vec<ClassificationEntry>),
    TextDescription(String),
    Placeholder { kind: PlaceholderKind, data: Vec<u8> },
    /// Unrecognized producer or record id.
    Opaque(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableLengthRecord {
    pub reserved: u16,
    pub user_id: String,
    pub record_id: u16,
    /// Content length after the sub-header (16-bit for VLRs, 64-bit for EVLRs).
    pub record_length: u64,
    pub description: String,
    pub content: VlrContent,
    /// Read with the 60-byte EVLR sub-header.
    pub extended: bool,
}

impl VariableLengthRecord {
    /// Read a 54-byte sub-header record.
    pub fn read(
        cursor: &mut BinaryCursor<'_>,
        notifications: &mut NotificationCollection,
    ) -> Result<Self> {
        Self::read_inner(cursor, false, notifications)
    }

    /// Read a 60-byte sub-header record (LAS 1.4 EVLR).
    pub fn read_extended(
        cursor: &mut BinaryCursor<'_>,
        notifications: &mut NotificationCollection,
    ) -> Result<Self> {
        Self::read_inner(cursor, true, notifications)
    }

    fn read_inner(
        cursor: &mut BinaryCursor<'_>,
        extended: bool,
        notifications: &mut NotificationCollection,
    ) -> Result<Self> {
        let start = cursor.position();
        let reserved = cursor.read_u16()?;
        let user_id = read_fixed_text(cursor, 16)?;
        let record_id = cursor.read_u16()?;
        let record_length = if extended {
            cursor.read_u64()?
        } else {
            cursor.read_u16()? as u64
        };
        let description = read_fixed_text(cursor, 32)?;

        let body_offset = cursor.position();
        let length = usize::try_from(record_length).map_err(|_| DecodeError::OutOfBounds {
            offset: cursor.position(),
            requested: usize::MAX,
            length: cursor.len(),
        })?;
        let body = cursor.read_bytes(length)?;
        log::trace!(
            "VLR {}/{} at {}: {} byte(s)",
            user_id,
            record_id,
            start,
            length
        );

        let content = decode_content(&user_id, record_id, body, start, body_offset, notifications)
            .map_err(|err| relocate(err, body_offset))?;
        Ok(Self {
            reserved,
            user_id,
            record_id,
            record_length,
            description,
            content,
            extended,
        })
    }
}

fn decode_content(
    user_id: &str,
    record_id: u16,
    body: &[u8],
    offset: usize,
    body_offset: usize,
    notifications: &mut NotificationCollection,
) -> Result<VlrContent> {
    let mut cursor = BinaryCursor::new(body);
    let placeholder = |kind: PlaceholderKind, notifications: &mut NotificationCollection| {
        notifications.notify(
            NotificationType::NotImplemented,
            offset,
            format!("{} record {} kept as raw bytes", user_id, record_id),
        );
        VlrContent::Placeholder {
            kind,
            data: body.to_vec(),
        }
    };

    let content = match user_id {
        PROJECTION_USER_ID => match record_id {
            34735 => VlrContent::GeoKeyDirectory(read_geo_key_directory(&mut cursor)?),
            34736 => {
                let values = (0..body.len() / 8)
                    .map(|_| cursor.read_f64())
                    .collect::<Result<Vec<_>>>()?;
                if cursor.remaining() > 0 {
                    notifications.notify(
                        NotificationType::Warning,
                        body_offset + cursor.position(),
                        format!(
                            "{} trailing byte(s) after {} double parameter(s) ignored",
                            cursor.remaining(),
                            values.len()
                        ),
                    );
                }
                VlrContent::GeoDoubleParams(values)
            }
            34737 => VlrContent::GeoAsciiParams(cursor.read_string(body.len())?),
            2111 => placeholder(PlaceholderKind::OgcMathTransform, notifications),
            2112 => placeholder(PlaceholderKind::OgcCoordinateSystem, notifications),
            _ => unsupported(user_id, record_id, body, offset, notifications),
        },
        SPEC_USER_ID => match record_id {
            0 => VlrContent::ClassificationLookup(read_classification_lookup(&mut cursor)?),
            3 => VlrContent::TextDescription(
                read_fixed_text(&mut cursor, body.len())?,
            ),
            2 => placeholder(PlaceholderKind::Histogram, notifications),
            4 => placeholder(PlaceholderKind::ExtraBytes, notifications),
            7 => placeholder(PlaceholderKind::Superseded, notifications),
            id if id < 100 => placeholder(PlaceholderKind::Reserved(id), notifications),
            id if id < 355 => placeholder(
                PlaceholderKind::WaveformPacketDescriptor(id - 99),
                notifications,
            ),
            65535 => placeholder(PlaceholderKind::WaveformData, notifications),
            _ => unsupported(user_id, record_id, body, offset, notifications),
        },
        _ => {
            notifications.notify(
                NotificationType::Warning,
                offset,
                format!(
                    "Unknown VLR producer {:?} (record {}), content kept as raw bytes",
                    user_id, record_id
                ),
            );
            VlrContent::Opaque(body.to_vec())
        }
    };
    Ok(content)
}

/// Shift body-relative error offsets to file offsets.
fn relocate(err: DecodeError, base: usize) -> DecodeError {
    match err {
        DecodeError::OutOfBounds {
            offset,
            requested,
            length,
        } => DecodeError::OutOfBounds {
            offset: base + offset,
            requested,
            length: base + length,
        },
        DecodeError::Misaligned { offset, bit_offset } => DecodeError::Misaligned {
            offset: base + offset,
            bit_offset,
        },
        other => other,
    }
}

fn unsupported(
    user_id: &str,
    record_id: u16,
    body: &[u8],
    offset: usize,
    notifications: &mut NotificationCollection,
) -> VlrContent {
    notifications.notify(
        NotificationType::NotSupported,
        offset,
        format!("{} record {} not recognized", user_id, record_id),
    );
    VlrContent::Opaque(body.to_vec())
}

fn read_geo_key_directory(cursor: &mut BinaryCursor<'_>) -> Result<GeoKeyDirectory> {
    let key_directory_version = cursor.read_u16()?;
    let key_revision = cursor.read_u16()?;
    let minor_revision = cursor.read_u16()?;
    let number_of_keys = cursor.read_u16()?;
    let keys = (0..number_of_keys)
        .map(|_| -> Result<GeoKeyEntry> {
            Ok(GeoKeyEntry {
                key_id: cursor.read_u16()?,
                tiff_tag_location: cursor.read_u16()?,
                count: cursor.read_u16()?,
                value_offset: cursor.read_u16()?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(GeoKeyDirectory {
        key_directory_version,
        key_revision,
        minor_revision,
        keys,
    })
}

/// Entries of 16 bytes: class byte plus a 15-byte description.
fn read_classification_lookup(cursor: &mut BinaryCursor<'_>) -> Result<Vec<ClassificationEntry>> {
    let mut entries = Vec::with_capacity(cursor.len() / 16);
    while cursor.remaining() >= 16 {
        let class = cursor.read_u8()?;
        let description = read_fixed_text(cursor, 15)?;
        entries.push(ClassificationEntry { class, description });
    }
    Ok(entries)
}
