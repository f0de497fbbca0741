//! Shape record content.
//!
//! Record headers are big-endian; everything from the shape type onward is
//! little-endian. Z and M blocks are optional and detected from the bytes
//! left before the record's declared end.

use crate::error::{DecodeError, Result};
use crate::io::cursor::BinaryCursor;
use crate::types::{BoundingBox2D, ValueRange, Vector2};

use super::polygon::{assemble_polygons, PolygonWithHoles};
use super::shape_type::{ShapeFamily, ShapeType};

/// Z or M values for every point of a shape, with their range.
#[derive(Debug, Clone, PartialEq)]
pub struct Measures {
    pub range: ValueRange,
    pub values: Vec<f64>,
}

/// A single point with optional Z and M.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointShape {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl PointShape {
    pub fn position(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}

/// Multi-part geometry shared by polylines and polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct PartedShape {
    pub bbox: BoundingBox2D,
    /// Index of the first point of each part.
    pub parts: Vec<usize>,
    pub points: Vec<Vector2>,
    pub z: Option<Measures>,
    pub m: Option<Measures>,
}

impl PartedShape {
    /// Points of each part, in part order.
    pub fn part_points(&self) -> Vec<&[Vector2]> {
        self.parts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = self.parts.get(i + 1).copied().unwrap_or(self.points.len());
                &self.points[start..end]
            })
            .collect()
    }
}

/// Polygon rings plus their exterior/hole grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub shape: PartedShape,
    pub polygons: Vec<PolygonWithHoles>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiPointShape {
    pub bbox: BoundingBox2D,
    pub points: Vec<Vector2>,
    pub z: Option<Measures>,
    pub m: Option<Measures>,
}

/// One decoded shape record.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeRecord {
    Null,
    Point(PointShape),
    Polyline(PartedShape),
    Polygon(PolygonShape),
    MultiPoint(MultiPointShape),
    /// Recognized but not decoded.
    MultiPatch,
}

impl ShapeRecord {
    /// Decode record content up to `end`, starting after the shape type.
    pub(crate) fn read(
        cursor: &mut BinaryCursor<'_>,
        shape_type: ShapeType,
        end: usize,
    ) -> Result<Self> {
        Ok(match shape_type.family() {
            ShapeFamily::Null => ShapeRecord::Null,
            ShapeFamily::Point => ShapeRecord::Point(read_point(cursor, shape_type, end)?),
            ShapeFamily::Polyline => {
                ShapeRecord::Polyline(read_parted(cursor, shape_type, end)?)
            }
            ShapeFamily::Polygon => {
                let shape = read_parted(cursor, shape_type, end)?;
                let rings = shape.part_points().into_iter().map(<[_]>::to_vec).collect();
                ShapeRecord::Polygon(PolygonShape {
                    polygons: assemble_polygons(rings),
                    shape,
                })
            }
            ShapeFamily::MultiPoint => {
                ShapeRecord::MultiPoint(read_multipoint(cursor, shape_type, end)?)
            }
            ShapeFamily::MultiPatch => ShapeRecord::MultiPatch,
        })
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ShapeRecord::Null)
    }
}

fn read_point(cursor: &mut BinaryCursor<'_>, shape_type: ShapeType, end: usize) -> Result<PointShape> {
    let x = cursor.read_f64()?;
    let y = cursor.read_f64()?;
    let z = if shape_type.has_z() {
        Some(cursor.read_f64()?)
    } else {
        None
    };
    let m = if shape_type.has_m() && cursor.position() + 8 <= end {
        Some(cursor.read_f64()?)
    } else {
        None
    };
    Ok(PointShape { x, y, z, m })
}

fn read_bbox(cursor: &mut BinaryCursor<'_>) -> Result<BoundingBox2D> {
    let min = Vector2::new(cursor.read_f64()?, cursor.read_f64()?);
    let max = Vector2::new(cursor.read_f64()?, cursor.read_f64()?);
    Ok(BoundingBox2D::new(min, max))
}

/// Read a non-negative count whose items are `item_size` bytes each.
fn read_count(cursor: &mut BinaryCursor<'_>, item_size: usize, what: &str) -> Result<usize> {
    let offset = cursor.position();
    let count = cursor.read_i32()?;
    if count < 0 {
        return Err(DecodeError::InvalidFormat(format!(
            "negative {} count {} at offset {}",
            what, count, offset
        )));
    }
    let count = count as usize;
    if count.saturating_mul(item_size) > cursor.len() {
        return Err(DecodeError::OutOfBounds {
            offset,
            requested: count.saturating_mul(item_size),
            length: cursor.len(),
        });
    }
    Ok(count)
}

fn read_points(cursor: &mut BinaryCursor<'_>, count: usize) -> Result<Vec<Vector2>> {
    (0..count)
        .map(|_| -> Result<Vector2> { Ok(Vector2::new(cursor.read_f64()?, cursor.read_f64()?)) })
        .collect()
}

fn read_measures(cursor: &mut BinaryCursor<'_>, count: usize) -> Result<Measures> {
    let range = ValueRange::new(cursor.read_f64()?, cursor.read_f64()?);
    let values = (0..count)
        .map(|_| cursor.read_f64())
        .collect::<Result<Vec<_>>>()?;
    Ok(Measures { range, values })
}

/// Z block is mandatory for Z types; M is read only when it fits.
fn read_z_and_m(
    cursor: &mut BinaryCursor<'_>,
    shape_type: ShapeType,
    count: usize,
    end: usize,
) -> Result<(Option<Measures>, Option<Measures>)> {
    let z = if shape_type.has_z() {
        Some(read_measures(cursor, count)?)
    } else {
        None
    };
    let m = if shape_type.has_m() && cursor.position() + 16 + 8 * count <= end {
        Some(read_measures(cursor, count)?)
    } else {
        None
    };
    Ok((z, m))
}

fn read_parted(cursor: &mut BinaryCursor<'_>, shape_type: ShapeType, end: usize) -> Result<PartedShape> {
    let bbox = read_bbox(cursor)?;
    let part_count = read_count(cursor, 4, "part")?;
    let point_count = read_count(cursor, 16, "point")?;

    let mut parts = Vec::with_capacity(part_count);
    for _ in 0..part_count {
        let offset = cursor.position();
        let start = cursor.read_i32()?;
        let previous = parts.last().copied().unwrap_or(0);
        if start < 0 || start as usize > point_count || (start as usize) < previous {
            return Err(DecodeError::InvalidFormat(format!(
                "part start {} out of order at offset {}",
                start, offset
            )));
        }
        parts.push(start as usize);
    }

    let points = read_points(cursor, point_count)?;
    let (z, m) = read_z_and_m(cursor, shape_type, point_count, end)?;
    Ok(PartedShape {
        bbox,
        parts,
        points,
        z,
        m,
    })
}

fn read_multipoint(
    cursor: &mut BinaryCursor<'_>,
    shape_type: ShapeType,
    end: usize,
) -> Result<MultiPointShape> {
    let bbox = read_bbox(cursor)?;
    let count = read_count(cursor, 16, "point")?;
    let points = read_points(cursor, count)?;
    let (z, m) = read_z_and_m(cursor, shape_type, count, end)?;
    Ok(MultiPointShape { bbox, points, z, m })
}
