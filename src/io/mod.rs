//! I/O module for decoding dBase, shapefile and LAS buffers

pub mod cursor;
pub mod dbf;
pub mod las;
pub mod shp;

pub use cursor::{BinaryCursor, Endianness};
pub use dbf::{DbfReader, DbfReaderConfiguration};
pub use las::{LasReader, LasReaderConfiguration};
pub use shp::{ShpReader, ShpReaderConfiguration};
