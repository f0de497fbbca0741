//! Shapefile shape-type codes.

use std::fmt;

/// Shape type stored in the file header and in each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ShapeType {
    Null = 0,
    Point = 1,
    Polyline = 3,
    Polygon = 5,
    MultiPoint = 8,
    PointZ = 11,
    PolylineZ = 13,
    PolygonZ = 15,
    MultiPointZ = 18,
    PointM = 21,
    PolylineM = 23,
    PolygonM = 25,
    MultiPointM = 28,
    MultiPatch = 31,
}

/// Content layout shared by a group of shape types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeFamily {
    Null,
    Point,
    Polyline,
    Polygon,
    MultiPoint,
    MultiPatch,
}

impl ShapeType {
    /// Look up a shape-type code; `None` for codes outside the closed set.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::Null,
            1 => Self::Point,
            3 => Self::Polyline,
            5 => Self::Polygon,
            8 => Self::MultiPoint,
            11 => Self::PointZ,
            13 => Self::PolylineZ,
            15 => Self::PolygonZ,
            18 => Self::MultiPointZ,
            21 => Self::PointM,
            23 => Self::PolylineM,
            25 => Self::PolygonM,
            28 => Self::MultiPointM,
            31 => Self::MultiPatch,
            _ => return None,
        })
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn family(self) -> ShapeFamily {
        match self {
            Self::Null => ShapeFamily::Null,
            Self::Point | Self::PointZ | Self::PointM => ShapeFamily::Point,
            Self::Polyline | Self::PolylineZ | Self::PolylineM => ShapeFamily::Polyline,
            Self::Polygon | Self::PolygonZ | Self::PolygonM => ShapeFamily::Polygon,
            Self::MultiPoint | Self::MultiPointZ | Self::MultiPointM => ShapeFamily::MultiPoint,
            Self::MultiPatch => ShapeFamily::MultiPatch,
        }
    }

    /// Whether records carry a Z block.
    pub fn has_z(self) -> bool {
        matches!(
            self,
            Self::PointZ | Self::PolylineZ | Self::PolygonZ | Self::MultiPointZ | Self::MultiPatch
        )
    }

    /// Whether records may carry an M block (optional for Z types).
    pub fn has_m(self) -> bool {
        self.has_z()
            || matches!(
                self,
                Self::PointM | Self::PolylineM | Self::PolygonM | Self::MultiPointM
            )
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}
