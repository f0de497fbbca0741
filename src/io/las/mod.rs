//! ASPRS LAS point cloud (`.las`) decoding, versions 1.0 to 1.4.

pub mod batch;
pub mod classification;
pub mod global_encoding;
pub mod header;
pub mod palette;
pub mod point;
pub mod reader;
pub mod version;
pub mod vlr;

pub use batch::{max_intensity, resolve_color, PointBatch, POINT_BATCH_SIZE};
pub use classification::{Classification, ReturnInfo};
pub use global_encoding::{GlobalEncoding, GpsTimeType};
pub use header::{ExtendedCounts, HeaderCommon, LasHeader, SIGNATURE};
pub use palette::class_color;
pub use point::{PointFormat, PointLayout, PointRecord, Rgb16, ScanAngle, WavePacket};
pub use reader::{decode, LasFile, LasReader, LasReaderConfiguration};
pub use version::LasVersion;
pub use vlr::{
    ClassificationEntry, GeoKeyDirectory, GeoKeyEntry, PlaceholderKind, VariableLengthRecord,
    VlrContent,
};
