//! Byte-level builders for dBase, shapefile and LAS test buffers.
//!
//! Each builder writes the on-disk layout field by field so tests can
//! corrupt individual bytes afterwards.

#![allow(dead_code)]

// ===========================================================================
// dBase
// ===========================================================================

/// One field descriptor for the table builders.
#[derive(Debug, Clone)]
pub struct DbfField {
    pub name: &'static str,
    pub code: u8,
    pub length: u8,
    pub decimals: u8,
}

impl DbfField {
    pub fn new(name: &'static str, code: u8, length: u8, decimals: u8) -> Self {
        Self {
            name,
            code,
            length,
            decimals,
        }
    }
}

fn record_length(fields: &[DbfField]) -> u16 {
    1 + fields.iter().map(|f| f.length as u16).sum::<u16>()
}

fn push_rows(bytes: &mut Vec<u8>, rows: &[Vec<u8>]) {
    for row in rows {
        bytes.extend_from_slice(row);
    }
    bytes.push(0x1A);
}

/// Record bytes: deleted flag followed by the raw field values.
pub fn dbf_row(deleted: bool, values: &[&[u8]]) -> Vec<u8> {
    let mut row = vec![if deleted { b'*' } else { b' ' }];
    for value in values {
        row.extend_from_slice(value);
    }
    row
}

/// dBASE III/IV style table (32-byte preamble and descriptors).
pub fn dbase3_table(
    version: u8,
    language_driver: u8,
    fields: &[DbfField],
    rows: &[Vec<u8>],
) -> Vec<u8> {
    let header_length = 32 + 32 * fields.len() as u16 + 1;
    let mut bytes = vec![0u8; 32];
    bytes[0] = version;
    bytes[1] = 124;
    bytes[2] = 6;
    bytes[3] = 15;
    bytes[4..8].copy_from_slice(&(rows.len() as u32).to_le_bytes());
    bytes[8..10].copy_from_slice(&header_length.to_le_bytes());
    bytes[10..12].copy_from_slice(&record_length(fields).to_le_bytes());
    bytes[29] = language_driver;
    for field in fields {
        let mut descriptor = [0u8; 32];
        descriptor[..field.name.len()].copy_from_slice(field.name.as_bytes());
        descriptor[11] = field.code;
        descriptor[16] = field.length;
        descriptor[17] = field.decimals;
        bytes.extend_from_slice(&descriptor);
    }
    bytes.push(0x0D);
    push_rows(&mut bytes, rows);
    bytes
}

/// Visual FoxPro table with the 263-byte backlink after the terminator.
pub fn visual_foxpro_table(
    version: u8,
    table_flags: u8,
    fields: &[DbfField],
    backlink: &str,
    rows: &[Vec<u8>],
) -> Vec<u8> {
    let header_length = 32 + 32 * fields.len() as u16 + 1 + 263;
    let mut bytes = vec![0u8; 32];
    bytes[0] = version;
    bytes[1] = 121;
    bytes[2] = 1;
    bytes[3] = 1;
    bytes[4..8].copy_from_slice(&(rows.len() as u32).to_le_bytes());
    bytes[8..10].copy_from_slice(&header_length.to_le_bytes());
    bytes[10..12].copy_from_slice(&record_length(fields).to_le_bytes());
    bytes[28] = table_flags;
    bytes[29] = 0x03;
    let mut displacement = 1u32;
    for field in fields {
        let mut descriptor = [0u8; 32];
        descriptor[..field.name.len()].copy_from_slice(field.name.as_bytes());
        descriptor[11] = field.code;
        descriptor[12..16].copy_from_slice(&displacement.to_le_bytes());
        descriptor[16] = field.length;
        descriptor[17] = field.decimals;
        if field.code == b'I' && field.name.starts_with("ID") {
            // autoincrementing integer: next value 10, step 1
            descriptor[18] = 0x0C;
            descriptor[19..23].copy_from_slice(&10u32.to_le_bytes());
            descriptor[23] = 1;
        }
        displacement += field.length as u32;
        bytes.extend_from_slice(&descriptor);
    }
    bytes.push(0x0D);
    let mut link = [0u8; 263];
    link[..backlink.len()].copy_from_slice(backlink.as_bytes());
    bytes.extend_from_slice(&link);
    push_rows(&mut bytes, rows);
    bytes
}

/// dBASE 7 table (68-byte preamble, 48-byte descriptors).
pub fn dbase7_table(driver_name: &str, fields: &[DbfField], rows: &[Vec<u8>]) -> Vec<u8> {
    dbase7_table_with_properties(driver_name, fields, &[], rows)
}

/// dBASE 7 table with a field properties block after the terminator,
/// covered by the declared header length.
pub fn dbase7_table_with_properties(
    driver_name: &str,
    fields: &[DbfField],
    properties: &[u8],
    rows: &[Vec<u8>],
) -> Vec<u8> {
    let header_length = 68 + 48 * fields.len() as u16 + 1 + properties.len() as u16;
    let mut bytes = vec![0u8; 68];
    bytes[0] = 0x04;
    bytes[1] = 125;
    bytes[2] = 3;
    bytes[3] = 9;
    bytes[4..8].copy_from_slice(&(rows.len() as u32).to_le_bytes());
    bytes[8..10].copy_from_slice(&header_length.to_le_bytes());
    bytes[10..12].copy_from_slice(&record_length(fields).to_le_bytes());
    bytes[29] = 0x57;
    bytes[32..32 + driver_name.len()].copy_from_slice(driver_name.as_bytes());
    for field in fields {
        let mut descriptor = [0u8; 48];
        descriptor[..field.name.len()].copy_from_slice(field.name.as_bytes());
        descriptor[32] = field.code;
        descriptor[33] = field.length;
        descriptor[34] = field.decimals;
        if field.code == b'+' {
            descriptor[40..44].copy_from_slice(&5u32.to_le_bytes());
        }
        bytes.extend_from_slice(&descriptor);
    }
    bytes.push(0x0D);
    bytes.extend_from_slice(properties);
    push_rows(&mut bytes, rows);
    bytes
}

/// dBASE II table: 8-byte preamble and a fixed 521-byte header.
pub fn dbase2_table(fields: &[DbfField], rows: &[Vec<u8>]) -> Vec<u8> {
    let mut bytes = vec![0u8; 8];
    bytes[0] = 0x02;
    bytes[1..3].copy_from_slice(&(rows.len() as u16).to_le_bytes());
    bytes[3] = 7;
    bytes[4] = 4;
    bytes[5] = 84;
    bytes[6..8].copy_from_slice(&record_length(fields).to_le_bytes());
    for field in fields {
        let mut descriptor = [0u8; 16];
        descriptor[..field.name.len()].copy_from_slice(field.name.as_bytes());
        descriptor[11] = field.code;
        descriptor[12] = field.length;
        descriptor[15] = field.decimals;
        bytes.extend_from_slice(&descriptor);
    }
    bytes.push(0x0D);
    bytes.resize(521, 0);
    push_rows(&mut bytes, rows);
    bytes
}

// ===========================================================================
// Shapefile
// ===========================================================================

/// Complete `.shp` buffer: header plus numbered records.
pub fn shp_file(shape_type: i32, contents: &[Vec<u8>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (index, content) in contents.iter().enumerate() {
        body.extend(((index + 1) as i32).to_be_bytes());
        body.extend(((content.len() / 2) as i32).to_be_bytes());
        body.extend(content);
    }
    let mut bytes = Vec::new();
    bytes.extend(9994i32.to_be_bytes());
    bytes.extend([0u8; 20]);
    bytes.extend((((100 + body.len()) / 2) as i32).to_be_bytes());
    bytes.extend(1000i32.to_le_bytes());
    bytes.extend(shape_type.to_le_bytes());
    for value in [0.0f64, 0.0, 10.0, 10.0, 0.0, 0.0, 0.0, 0.0] {
        bytes.extend(value.to_le_bytes());
    }
    bytes.extend(body);
    bytes
}

fn push_f64s(bytes: &mut Vec<u8>, values: &[f64]) {
    for value in values {
        bytes.extend(value.to_le_bytes());
    }
}

pub fn shp_point(x: f64, y: f64) -> Vec<u8> {
    let mut content = 1i32.to_le_bytes().to_vec();
    push_f64s(&mut content, &[x, y]);
    content
}

pub fn shp_point_z(x: f64, y: f64, z: f64, m: Option<f64>) -> Vec<u8> {
    let mut content = 11i32.to_le_bytes().to_vec();
    push_f64s(&mut content, &[x, y, z]);
    if let Some(m) = m {
        push_f64s(&mut content, &[m]);
    }
    content
}

pub fn shp_null() -> Vec<u8> {
    0i32.to_le_bytes().to_vec()
}

/// Polyline or polygon content; `z` adds a Z block with one value per point.
pub fn shp_parts(shape_type: i32, parts: &[Vec<(f64, f64)>], z: Option<f64>) -> Vec<u8> {
    let points: Vec<(f64, f64)> = parts.iter().flatten().copied().collect();
    let mut content = shape_type.to_le_bytes().to_vec();
    push_f64s(&mut content, &[0.0, 0.0, 10.0, 10.0]);
    content.extend((parts.len() as i32).to_le_bytes());
    content.extend((points.len() as i32).to_le_bytes());
    let mut start = 0i32;
    for part in parts {
        content.extend(start.to_le_bytes());
        start += part.len() as i32;
    }
    for (x, y) in &points {
        push_f64s(&mut content, &[*x, *y]);
    }
    if let Some(z) = z {
        push_f64s(&mut content, &[z, z]);
        for _ in &points {
            push_f64s(&mut content, &[z]);
        }
    }
    content
}

/// Closed axis-aligned square ring; `clockwise` selects exterior winding.
pub fn square_ring(x0: f64, y0: f64, size: f64, clockwise: bool) -> Vec<(f64, f64)> {
    let mut ring = vec![
        (x0, y0),
        (x0 + size, y0),
        (x0 + size, y0 + size),
        (x0, y0 + size),
        (x0, y0),
    ];
    if clockwise {
        ring.reverse();
    }
    ring
}

// ===========================================================================
// LAS
// ===========================================================================

/// Format 0 point record.
pub fn las_point0(xyz: [i32; 3], intensity: u16, returns: u8, classification: u8) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(20);
    for value in xyz {
        bytes.extend(value.to_le_bytes());
    }
    bytes.extend(intensity.to_le_bytes());
    bytes.push(returns);
    bytes.push(classification);
    bytes.push(0);
    bytes.push(0);
    bytes.extend(1u16.to_le_bytes());
    bytes
}

/// Format 2 point record (format 0 plus RGB).
pub fn las_point2(xyz: [i32; 3], intensity: u16, classification: u8, rgb: [u16; 3]) -> Vec<u8> {
    let mut bytes = las_point0(xyz, intensity, 0b0000_1001, classification);
    for channel in rgb {
        bytes.extend(channel.to_le_bytes());
    }
    bytes
}

/// Format 6 point record.
pub fn las_point6(xyz: [i32; 3], intensity: u16, returns: u8, flags: u8, class: u8) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(30);
    for value in xyz {
        bytes.extend(value.to_le_bytes());
    }
    bytes.extend(intensity.to_le_bytes());
    bytes.push(returns);
    bytes.push(flags);
    bytes.push(class);
    bytes.push(0);
    bytes.extend(0i16.to_le_bytes());
    bytes.extend(1u16.to_le_bytes());
    bytes.extend(100.0f64.to_le_bytes());
    bytes
}

/// Waveform packet block (29 bytes) for formats 4, 5, 9 and 10.
pub fn las_wave_packet(
    descriptor_index: u8,
    byte_offset: u64,
    packet_size: u32,
    return_point_location: f32,
    xyz_t: [f32; 3],
) -> Vec<u8> {
    let mut bytes = vec![descriptor_index];
    bytes.extend(byte_offset.to_le_bytes());
    bytes.extend(packet_size.to_le_bytes());
    bytes.extend(return_point_location.to_le_bytes());
    for value in xyz_t {
        bytes.extend(value.to_le_bytes());
    }
    bytes
}

/// VLR with a 54-byte sub-header.
pub fn las_vlr(user_id: &str, record_id: u16, body: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0u8; 2];
    let mut user = [0u8; 16];
    user[..user_id.len()].copy_from_slice(user_id.as_bytes());
    bytes.extend(user);
    bytes.extend(record_id.to_le_bytes());
    bytes.extend((body.len() as u16).to_le_bytes());
    bytes.extend([0u8; 32]);
    bytes.extend(body);
    bytes
}

/// EVLR with a 60-byte sub-header.
pub fn las_evlr(user_id: &str, record_id: u16, body: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0u8; 2];
    let mut user = [0u8; 16];
    user[..user_id.len()].copy_from_slice(user_id.as_bytes());
    bytes.extend(user);
    bytes.extend(record_id.to_le_bytes());
    bytes.extend((body.len() as u64).to_le_bytes());
    bytes.extend([0u8; 32]);
    bytes.extend(body);
    bytes
}

/// LAS file assembled from a version, a format and raw records.
#[derive(Debug, Clone)]
pub struct LasBuilder {
    pub minor: u8,
    pub format: u8,
    /// Defaults to the length of the first point.
    pub record_length: Option<u16>,
    pub points: Vec<Vec<u8>>,
    pub vlrs: Vec<Vec<u8>>,
    pub evlrs: Vec<Vec<u8>>,
    pub scale: [f64; 3],
    pub offset: [f64; 3],
    /// Overrides for the two point count fields.
    pub legacy_count: Option<u32>,
    pub extended_count: Option<u64>,
    pub global_encoding: u16,
    pub file_source_id: u16,
    /// Written for 1.3 and later.
    pub start_of_waveform_data: u64,
}

impl LasBuilder {
    pub fn new(minor: u8, format: u8) -> Self {
        Self {
            minor,
            format,
            record_length: None,
            points: Vec::new(),
            vlrs: Vec::new(),
            evlrs: Vec::new(),
            scale: [0.01, 0.01, 0.01],
            offset: [0.0, 0.0, 0.0],
            legacy_count: None,
            extended_count: None,
            global_encoding: 0,
            file_source_id: 1,
            start_of_waveform_data: 0,
        }
    }

    pub fn point(mut self, record: Vec<u8>) -> Self {
        self.points.push(record);
        self
    }

    pub fn vlr(mut self, record: Vec<u8>) -> Self {
        self.vlrs.push(record);
        self
    }

    pub fn header_size(&self) -> usize {
        match self.minor {
            0..=2 => 227,
            3 => 235,
            _ => 375,
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let header_size = self.header_size();
        let vlr_bytes: usize = self.vlrs.iter().map(Vec::len).sum();
        let point_offset = header_size + vlr_bytes;
        let record_length = self
            .record_length
            .unwrap_or_else(|| self.points.first().map_or(20, |p| p.len() as u16));
        let count = self.points.len();

        let mut bytes = vec![0u8; header_size];
        bytes[..4].copy_from_slice(b"LASF");
        bytes[4..6].copy_from_slice(&self.file_source_id.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.global_encoding.to_le_bytes());
        bytes[24] = 1;
        bytes[25] = self.minor;
        bytes[26..35].copy_from_slice(b"GEODECODE");
        bytes[58..62].copy_from_slice(b"test");
        bytes[90..92].copy_from_slice(&100u16.to_le_bytes());
        bytes[92..94].copy_from_slice(&2024u16.to_le_bytes());
        bytes[94..96].copy_from_slice(&(header_size as u16).to_le_bytes());
        bytes[96..100].copy_from_slice(&(point_offset as u32).to_le_bytes());
        bytes[100..104].copy_from_slice(&(self.vlrs.len() as u32).to_le_bytes());
        bytes[104] = self.format;
        bytes[105..107].copy_from_slice(&record_length.to_le_bytes());
        let legacy = self.legacy_count.unwrap_or(count as u32);
        bytes[107..111].copy_from_slice(&legacy.to_le_bytes());
        for (i, value) in self.scale.iter().chain(self.offset.iter()).enumerate() {
            let at = 131 + i * 8;
            bytes[at..at + 8].copy_from_slice(&value.to_le_bytes());
        }

        if self.minor >= 3 {
            bytes[227..235].copy_from_slice(&self.start_of_waveform_data.to_le_bytes());
        }
        if self.minor >= 4 {
            let extended = self.extended_count.unwrap_or(count as u64);
            bytes[247..255].copy_from_slice(&extended.to_le_bytes());
            if !self.evlrs.is_empty() {
                let evlr_start = point_offset + count * record_length as usize;
                bytes[235..243].copy_from_slice(&(evlr_start as u64).to_le_bytes());
                bytes[243..247].copy_from_slice(&(self.evlrs.len() as u32).to_le_bytes());
            }
        }

        for vlr in &self.vlrs {
            bytes.extend_from_slice(vlr);
        }
        for point in &self.points {
            let mut record = point.clone();
            record.resize(record_length as usize, 0);
            bytes.extend(record);
        }
        for evlr in &self.evlrs {
            bytes.extend_from_slice(evlr);
        }
        bytes
    }
}
