//! Batched point output with resolved positions and colors.

use crate::types::{PointColor, Vector3};

use super::palette::class_color;
use super::point::PointRecord;

/// Upper bound on points per batch.
pub const POINT_BATCH_SIZE: usize = 65_536;

/// A run of consecutive points. The three vectors are index-aligned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointBatch {
    pub records: Vec<PointRecord>,
    pub positions: Vec<Vector3>,
    pub colors: Vec<PointColor>,
}

impl PointBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Largest intensity over all records, 0 when there are none.
pub fn max_intensity(records: &[PointRecord]) -> u16 {
    records.iter().map(|p| p.intensity).max().unwrap_or(0)
}

/// Resolve a point's color: RGB, then class palette, then grayscale intensity.
pub fn resolve_color(record: &PointRecord, max_intensity: u16) -> PointColor {
    if let Some(rgb) = record.color {
        return PointColor::from_rgb16(rgb.red, rgb.green, rgb.blue);
    }
    if let Some(color) = class_color(record.classification.class) {
        return color;
    }
    if max_intensity == 0 {
        PointColor::gray(0.0)
    } else {
        PointColor::gray(record.intensity as f32 / max_intensity as f32)
    }
}

/// Position and color transform shared by every batch of one file.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BatchTransform {
    pub scale: Vector3,
    pub offset: Option<Vector3>,
    pub max_intensity: u16,
}

impl BatchTransform {
    fn position(&self, record: &PointRecord) -> Vector3 {
        let raw = Vector3::new(record.x as f64, record.y as f64, record.z as f64);
        let scaled = raw.scale(&self.scale);
        match self.offset {
            Some(offset) => scaled + offset,
            None => scaled,
        }
    }
}

/// Split records into batches of at most `batch_size` points.
pub(crate) fn build_batches(
    records: Vec<PointRecord>,
    transform: BatchTransform,
    batch_size: usize,
) -> Vec<PointBatch> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::with_capacity(records.len().div_ceil(batch_size));
    let mut current = PointBatch::default();

    for record in records {
        current.positions.push(transform.position(&record));
        current
            .colors
            .push(resolve_color(&record, transform.max_intensity));
        current.records.push(record);
        if current.len() == batch_size {
            batches.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }

    log::debug!("Emitted {} point batch(es)", batches.len());
    batches
}
