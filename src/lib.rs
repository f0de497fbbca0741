//! # geodecode
//!
//! A pure Rust library for decoding geospatial binary formats from
//! in-memory buffers.
//!
//! ## Features
//!
//! - dBase attribute tables (`.dbf`): dBase II, III, IV, 7 and Visual FoxPro
//!   headers with code-page aware text decoding
//! - ESRI shapefiles (`.shp`): every shape type, including Z/M variants,
//!   with polygon rings grouped into exteriors and holes
//! - ASPRS LAS point clouds (`.las`): versions 1.0 to 1.4, point formats 0
//!   to 10, variable-length records, batched output with resolved colors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use geodecode::io::{dbf, las, shp};
//!
//! let table = dbf::decode(&std::fs::read("parcels.dbf")?)?;
//! let shapes = shp::decode(&std::fs::read("parcels.shp")?)?;
//! assert_eq!(table.records.len(), shapes.records.len());
//!
//! let cloud = las::decode(&std::fs::read("survey.las")?)?;
//! println!("{} points", cloud.point_count());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`io::BinaryCursor`] - bounds-checked reads with switchable byte order
//!   and MSB-first bit reads
//! - one reader per format (`DbfReader`, `ShpReader`, `LasReader`) built with
//!   `from_bytes`, tuned with `with_config` and consumed by `read`
//! - [`notification::NotificationCollection`] - recoverable defects attached
//!   to every decoded file; fatal ones surface as [`DecodeError`]
//!
//! The library performs no I/O of its own and never installs a logger.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod io;
pub mod notification;
pub mod types;

// Re-export commonly used types
pub use error::{DecodeError, Result};
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use types::{BoundingBox2D, BoundingBox3D, PointColor, ValueRange, Vector2, Vector3};

// Re-export decoded file types
pub use io::dbf::DbfFile;
pub use io::las::LasFile;
pub use io::shp::ShpFile;

// Re-export I/O types
pub use io::{DbfReader, LasReader, ShpReader};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
