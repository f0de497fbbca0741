//! ESRI shapefile (`.shp`) decoding.

pub mod header;
pub mod polygon;
pub mod reader;
pub mod record;
pub mod shape_type;

pub use header::{ShpHeader, FILE_CODE, HEADER_LENGTH};
pub use polygon::{assemble_polygons, ring_contains, signed_area, winding, PolygonWithHoles, Winding};
pub use reader::{decode, ShpFile, ShpReader, ShpReaderConfiguration};
pub use record::{Measures, MultiPointShape, PartedShape, PointShape, PolygonShape, ShapeRecord};
pub use shape_type::{ShapeFamily, ShapeType};
