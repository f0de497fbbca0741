//! dBase (`.dbf`) attribute table decoding.
//!
//! A version byte selects one of four header layouts (dBASE II, dBASE III/IV,
//! Visual FoxPro, dBASE 7). The header carries the field descriptors; the
//! body is a stream of fixed-width records, each decoded into typed values
//! keyed by field name.

pub mod code_page;
pub mod field;
pub mod header;
pub mod reader;
pub mod record;
pub mod version;

pub use code_page::encoding_from_language_driver;
pub use field::{Autoincrement, FieldDescriptor, FieldFlags, FieldType};
pub use header::{DbfHeader, HeaderExtra, LastUpdate, TableFlags, FIELD_TERMINATOR};
pub use reader::{decode, DbfFile, DbfReader, DbfReaderConfiguration};
pub use record::{parse_integer, parse_logical, AttributeRecord, FieldValue};
pub use version::{DbfVersion, HeaderLayout};
