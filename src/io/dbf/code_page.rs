//! dBase language driver id to encoding mapping.
//!
//! The language driver byte (offset 29 of the table header) names the code
//! page the character data was written in. DOS code pages that
//! `encoding_rs` does not carry are mapped to the closest Windows code page.

use encoding_rs::Encoding;

/// Get the `encoding_rs` encoding for a dBase language driver id.
///
/// Returns `None` when the id is 0 (not recorded) or not recognized; callers
/// then fall back to Windows-1252.
pub fn encoding_from_language_driver(driver_id: u8) -> Option<&'static Encoding> {
    match driver_id {
        0x00 => None,

        // DOS Western European (437, 850, 860, 861, 863, 865)
        0x01 | 0x02 | 0x08..=0x12 | 0x14..=0x1B | 0x1C | 0x1D | 0x24 | 0x25 | 0x37 | 0x66
        | 0x67 => Some(encoding_rs::WINDOWS_1252),

        // DOS Central European (852)
        0x1F | 0x22 | 0x23 | 0x40 | 0x64 | 0x87 => Some(encoding_rs::WINDOWS_1250),

        // DOS Cyrillic (866)
        0x26 | 0x65 => Some(encoding_rs::IBM866),

        // DOS Greek (737) / Turkish (857)
        0x6A | 0x86 => Some(encoding_rs::WINDOWS_1253),
        0x6B | 0x88 => Some(encoding_rs::WINDOWS_1254),

        // Macintosh
        0x04 => Some(encoding_rs::MACINTOSH),
        0x96 => Some(encoding_rs::X_MAC_CYRILLIC),
        0x97 => Some(encoding_rs::WINDOWS_1250),
        0x98 => Some(encoding_rs::WINDOWS_1253),

        // Asian encodings
        0x13 | 0x7B => Some(encoding_rs::SHIFT_JIS),
        0x4D | 0x7A => Some(encoding_rs::GBK),
        0x4E | 0x79 => Some(encoding_rs::EUC_KR),
        0x4F | 0x78 => Some(encoding_rs::BIG5),
        0x50 | 0x7C => Some(encoding_rs::WINDOWS_874),

        // Windows/ANSI code pages
        0x03 | 0x57 | 0x58 | 0x59 => Some(encoding_rs::WINDOWS_1252),
        0x7D => Some(encoding_rs::WINDOWS_1255),
        0x7E => Some(encoding_rs::WINDOWS_1256),
        0xC8 => Some(encoding_rs::WINDOWS_1250),
        0xC9 => Some(encoding_rs::WINDOWS_1251),
        0xCA => Some(encoding_rs::WINDOWS_1254),
        0xCB => Some(encoding_rs::WINDOWS_1253),
        0xCC => Some(encoding_rs::WINDOWS_1257),

        _ => None,
    }
}
