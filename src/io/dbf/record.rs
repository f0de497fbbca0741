//! dBase records and typed field values.

use encoding_rs::Encoding;
use indexmap::IndexMap;

use crate::error::{DecodeError, Result};
use crate::io::cursor::BinaryCursor;

use super::field::{FieldDescriptor, FieldType};

/// Deleted-flag byte of a live record.
pub const RECORD_VALID: u8 = b' ';
/// Deleted-flag byte of a deleted record.
pub const RECORD_DELETED: u8 = b'*';

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// `B`, `N`, `F` text, and `I` / `+` binary integers.
    Integer(i64),
    /// `O` doubles.
    Float(f64),
    /// `C` text, verbatim (padding kept).
    Text(String),
    /// `L`: `Some(true)`, `Some(false)` or `None` for unknown.
    Logical(Option<bool>),
    /// `D`, `M`, `G` text, verbatim.
    Raw(String),
    /// Numeric text without any digits (blank field).
    Null,
}

impl FieldValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) | FieldValue::Raw(text) => Some(text),
            _ => None,
        }
    }

    /// Encode the value into its on-disk bytes for `field`.
    ///
    /// Text is padded with spaces (or cut) to the field width; numeric text
    /// is right-aligned.
    pub fn encode(&self, field: &FieldDescriptor, encoding: &'static Encoding) -> Result<Vec<u8>> {
        let field_type = field.field_type().ok_or_else(|| invalid_type(field, 0))?;
        let width = field.length as usize;
        let bytes = match (field_type, self) {
            (FieldType::Long | FieldType::Autoincrement, FieldValue::Integer(value)) => {
                let value = i32::try_from(*value).map_err(|_| {
                    DecodeError::InvalidFormat(format!(
                        "Value {} does not fit the 4-byte field {:?}",
                        value, field.name
                    ))
                })?;
                value.to_le_bytes().to_vec()
            }
            (FieldType::Double, FieldValue::Float(value)) => value.to_le_bytes().to_vec(),
            (FieldType::Binary | FieldType::Numeric | FieldType::Float, FieldValue::Integer(value)) => {
                let text = format!("{:>width$}", value, width = width);
                if text.len() > width {
                    return Err(DecodeError::InvalidFormat(format!(
                        "Value {} is wider than field {:?} ({} bytes)",
                        value, field.name, width
                    )));
                }
                text.into_bytes()
            }
            (FieldType::Binary | FieldType::Numeric | FieldType::Float, FieldValue::Null) => {
                vec![b' '; width]
            }
            (FieldType::Logical, FieldValue::Logical(value)) => {
                let flag = match value {
                    Some(true) => b'T',
                    Some(false) => b'F',
                    None => b'?',
                };
                let mut bytes = vec![b' '; width.max(1)];
                bytes[0] = flag;
                bytes
            }
            (FieldType::Character, FieldValue::Text(text))
            | (FieldType::Date | FieldType::Memo | FieldType::General, FieldValue::Raw(text)) => {
                let (encoded, _, _) = encoding.encode(text);
                let mut bytes = encoded.into_owned();
                bytes.resize(width, b' ');
                bytes
            }
            (_, value) => {
                return Err(DecodeError::InvalidFormat(format!(
                    "Cannot store {:?} in field {:?} of type {}",
                    value, field.name, field_type
                )))
            }
        };
        Ok(bytes)
    }
}

/// One decoded table row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeRecord {
    pub deleted: bool,
    /// Values keyed by field name, in descriptor order.
    pub fields: IndexMap<String, FieldValue>,
}

impl AttributeRecord {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Decode one record at the cursor: the deleted flag, then one value per
    /// descriptor.
    ///
    /// Returns the record and the raw deleted-flag byte.
    pub fn read(cursor: &mut BinaryCursor<'_>, fields: &[FieldDescriptor]) -> Result<(Self, u8)> {
        let flag = cursor.read_u8()?;
        let mut values = IndexMap::with_capacity(fields.len());
        for field in fields {
            let value = read_value(cursor, field)?;
            values.insert(field.name.clone(), value);
        }
        Ok((
            Self {
                deleted: flag == RECORD_DELETED,
                fields: values,
            },
            flag,
        ))
    }

    /// Encode the record back into its on-disk bytes.
    pub fn encode(&self, fields: &[FieldDescriptor], encoding: &'static Encoding) -> Result<Vec<u8>> {
        let mut bytes = vec![if self.deleted {
            RECORD_DELETED
        } else {
            RECORD_VALID
        }];
        for field in fields {
            let value = self.fields.get(&field.name).ok_or_else(|| {
                DecodeError::InvalidFormat(format!("Record has no value for field {:?}", field.name))
            })?;
            bytes.extend(value.encode(field, encoding)?);
        }
        Ok(bytes)
    }
}

fn invalid_type(field: &FieldDescriptor, offset: usize) -> DecodeError {
    DecodeError::InvalidFieldType {
        field: field.name.clone(),
        code: field.type_code,
        offset,
    }
}

/// Decode one field value according to its type code.
pub fn read_value(cursor: &mut BinaryCursor<'_>, field: &FieldDescriptor) -> Result<FieldValue> {
    let offset = cursor.position();
    let field_type = field
        .field_type()
        .ok_or_else(|| invalid_type(field, offset))?;
    let width = field.length as usize;
    let value = match field_type {
        FieldType::Binary | FieldType::Numeric | FieldType::Float => {
            parse_integer(&cursor.read_string(width)?).map_or(FieldValue::Null, FieldValue::Integer)
        }
        FieldType::Character => FieldValue::Text(cursor.read_string(width)?),
        FieldType::Date | FieldType::Memo | FieldType::General => {
            FieldValue::Raw(cursor.read_string(width)?)
        }
        FieldType::Logical => {
            let text = cursor.read_string(width)?;
            FieldValue::Logical(parse_logical(text.chars().next().unwrap_or(' ')))
        }
        FieldType::Long | FieldType::Autoincrement => FieldValue::Integer(cursor.read_i32()? as i64),
        FieldType::Double => FieldValue::Float(cursor.read_f64()?),
    };
    Ok(value)
}

/// Leading-integer parse of numeric text.
///
/// Leading whitespace is skipped, an optional sign is accepted and digits are
/// taken up to the first non-digit, so `" 12.75"` yields 12. Text without any
/// digit yields `None`.
pub fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim_start_matches(|c: char| c.is_whitespace() || c == '\0');
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Map a logical flag character; anything unrecognized is unknown.
pub fn parse_logical(flag: char) -> Option<bool> {
    match flag {
        'Y' | 'y' | 'T' | 't' => Some(true),
        'N' | 'n' | 'F' | 'f' => Some(false),
        _ => None,
    }
}
