//! Integration tests for dBase table decoding

mod common;

use common::builders::{
    dbase2_table, dbase3_table, dbase7_table, dbase7_table_with_properties, dbf_row,
    visual_foxpro_table, DbfField,
};
use common::{assert_no_warnings, messages};
use geodecode::io::dbf::{
    self, DbfReader, DbfReaderConfiguration, DbfVersion, FieldFlags, FieldValue, HeaderExtra,
    TableFlags,
};
use geodecode::{DecodeError, NotificationType};
use proptest::prelude::*;

fn parcel_fields() -> Vec<DbfField> {
    vec![
        DbfField::new("NAME", b'C', 8, 0),
        DbfField::new("AREA", b'N', 6, 2),
        DbfField::new("ACTIVE", b'L', 1, 0),
        DbfField::new("SURVEYED", b'D', 8, 0),
    ]
}

#[test]
fn test_hello_scenario() {
    let bytes = dbase3_table(
        0x03,
        0,
        &[DbfField::new("name", b'C', 5, 0)],
        &[dbf_row(false, &[b"HELLO"])],
    );
    let table = dbf::decode(&bytes).unwrap();
    assert_eq!(table.records.len(), 1);
    let record = &table.records[0];
    assert!(!record.deleted);
    assert_eq!(record.fields.len(), 1);
    assert_eq!(record.get("name"), Some(&FieldValue::Text("HELLO".into())));
    assert_no_warnings(&table.notifications);
}

#[test]
fn test_typed_values_in_descriptor_order() {
    let rows = vec![
        dbf_row(false, &[b"Lot 12  ", b" 12.75", b"T", b"20240615"]),
        dbf_row(true, &[b"Lot 13  ", b"      ", b"?", b"        "]),
    ];
    let table = dbf::decode(&dbase3_table(0x03, 0x57, &parcel_fields(), &rows)).unwrap();

    assert_eq!(table.header.record_count, 2);
    assert_eq!(table.records.len(), 2);
    let names: Vec<_> = table.records[0].fields.keys().cloned().collect();
    assert_eq!(names, ["NAME", "AREA", "ACTIVE", "SURVEYED"]);

    let first = &table.records[0];
    assert_eq!(first.get("AREA"), Some(&FieldValue::Integer(12)));
    assert_eq!(first.get("ACTIVE"), Some(&FieldValue::Logical(Some(true))));
    assert_eq!(first.get("SURVEYED"), Some(&FieldValue::Raw("20240615".into())));

    let second = &table.records[1];
    assert!(second.deleted);
    assert_eq!(second.get("AREA"), Some(&FieldValue::Null));
    assert_eq!(second.get("ACTIVE"), Some(&FieldValue::Logical(None)));
}

#[test]
fn test_field_count_matches_header() {
    let bytes = dbase3_table(0x83, 0, &parcel_fields(), &[]);
    let table = dbf::decode(&bytes).unwrap();
    assert_eq!(table.header.version, DbfVersion::DBase3Memo);
    assert_eq!(table.header.fields.len(), 4);
    assert!(table.records.is_empty());
}

#[test]
fn test_missing_terminator_warns() {
    let fields = [DbfField::new("ID", b'N', 3, 0)];
    let mut bytes = dbase3_table(0x03, 0, &fields, &[dbf_row(false, &[b"  7"])]);
    // replace the terminator with padding; header length still points past it
    bytes[64] = 0x20;
    let table = dbf::decode(&bytes).unwrap();
    assert!(!table.header.terminated);
    assert_eq!(messages(&table.notifications, NotificationType::Warning).len(), 1);
    assert_eq!(table.records[0].get("ID"), Some(&FieldValue::Integer(7)));
}

#[test]
fn test_unknown_field_type_is_fatal() {
    let fields = [DbfField::new("ODD", b'Q', 2, 0)];
    let bytes = dbase3_table(0x03, 0, &fields, &[dbf_row(false, &[b"xx"])]);
    let err = dbf::decode(&bytes).unwrap_err();
    assert_eq!(
        err,
        DecodeError::InvalidFieldType {
            field: "ODD".into(),
            code: 'Q',
            offset: 66,
        }
    );
}

#[test]
fn test_unknown_version_is_fatal() {
    let bytes = dbase3_table(0x99, 0, &parcel_fields(), &[]);
    assert_eq!(
        dbf::decode(&bytes).unwrap_err(),
        DecodeError::InvalidVersion {
            offset: 0,
            found: 0x99
        }
    );
}

#[test]
fn test_language_driver_selects_encoding() {
    let fields = [DbfField::new("CITY", b'C', 6, 0)];
    // "Москва" in Windows-1251
    let city = [0xCC, 0xEE, 0xF1, 0xEA, 0xE2, 0xE0];
    let bytes = dbase3_table(0x03, 0xC9, &fields, &[dbf_row(false, &[&city])]);
    let table = dbf::decode(&bytes).unwrap();
    assert_eq!(table.header.language_driver(), Some(0xC9));
    assert_eq!(
        table.records[0].get("CITY").and_then(FieldValue::as_str),
        Some("Москва")
    );
}

#[test]
fn test_configured_encoding_overrides_driver() {
    let fields = [DbfField::new("CITY", b'C', 6, 0)];
    let city = [0xCC, 0xEE, 0xF1, 0xEA, 0xE2, 0xE0];
    let bytes = dbase3_table(0x03, 0xC9, &fields, &[dbf_row(false, &[&city])]);
    let table = DbfReader::from_bytes(&bytes)
        .with_config(DbfReaderConfiguration {
            encoding: Some(encoding_rs::WINDOWS_1252),
            ..Default::default()
        })
        .read()
        .unwrap();
    assert_eq!(
        table.records[0].get("CITY").and_then(FieldValue::as_str),
        Some("Ìîñêâà")
    );
}

#[test]
fn test_visual_foxpro_table() {
    let fields = [
        DbfField::new("ID", b'I', 4, 0),
        DbfField::new("PRICE", b'O', 8, 0),
        DbfField::new("LABEL", b'C', 4, 0),
    ];
    let mut row = vec![b' '];
    row.extend(42i32.to_le_bytes());
    row.extend(9.5f64.to_le_bytes());
    row.extend(b"abcd");
    let bytes = visual_foxpro_table(0x30, 0x03, &fields, "..\\data\\shop.dbc", &[row]);

    let table = dbf::decode(&bytes).unwrap();
    assert_eq!(table.header.version, DbfVersion::VisualFoxPro);
    assert_eq!(table.header.fields.len(), 3);
    match &table.header.extra {
        HeaderExtra::VisualFoxPro {
            table_flags,
            backlink,
            ..
        } => {
            assert_eq!(*table_flags, TableFlags::STRUCTURAL_INDEX | TableFlags::MEMO);
            assert_eq!(backlink, "..\\data\\shop.dbc");
        }
        other => panic!("unexpected header extra {:?}", other),
    }

    let id = table.header.field("ID").unwrap();
    assert!(id.flags.contains(FieldFlags::AUTO_INCREMENT));
    assert_eq!(id.autoincrement.unwrap().next_value, 10);

    let record = &table.records[0];
    assert_eq!(record.get("ID"), Some(&FieldValue::Integer(42)));
    assert_eq!(record.get("PRICE"), Some(&FieldValue::Float(9.5)));
    assert_eq!(record.get("LABEL"), Some(&FieldValue::Text("abcd".into())));
    assert_no_warnings(&table.notifications);
}

#[test]
fn test_dbase7_table() {
    let fields = [
        DbfField::new("COUNTER", b'+', 4, 0),
        DbfField::new("DESCRIPTION_OF_THE_PARCEL", b'C', 3, 0),
    ];
    let mut row = vec![b' '];
    row.extend((-3i32).to_le_bytes());
    row.extend(b"xyz");
    let table = dbf::decode(&dbase7_table("DB437US0", &fields, &[row])).unwrap();

    assert_eq!(table.header.version, DbfVersion::DBase7);
    match &table.header.extra {
        HeaderExtra::DBase7 {
            language_driver_name,
            ..
        } => assert_eq!(language_driver_name, "DB437US0"),
        other => panic!("unexpected header extra {:?}", other),
    }
    let counter = table.header.field("COUNTER").unwrap();
    assert_eq!(counter.autoincrement.unwrap().next_value, 5);
    assert_eq!(table.records[0].get("COUNTER"), Some(&FieldValue::Integer(-3)));
    assert_eq!(
        table.records[0].get("DESCRIPTION_OF_THE_PARCEL"),
        Some(&FieldValue::Text("xyz".into()))
    );
}

#[test]
fn test_dbase7_field_properties_after_terminator() {
    let fields = [DbfField::new("TAG", b'C', 3, 0)];
    let mut properties = vec![0u8; 48];
    properties[0..2].copy_from_slice(&1u16.to_le_bytes());
    properties[4..6].copy_from_slice(&36u16.to_le_bytes());
    let bytes = dbase7_table_with_properties(
        "DB437US0",
        &fields,
        &properties,
        &[dbf_row(false, &[b"abc"])],
    );

    let table = dbf::decode(&bytes).unwrap();
    assert_eq!(table.header.header_length, 68 + 48 + 1 + 48);
    assert_eq!(table.header.fields.len(), 1);
    assert!(table.header.terminated);
    assert_eq!(table.records.len(), 1);
    assert_eq!(
        table.records[0].get("TAG"),
        Some(&FieldValue::Text("abc".into()))
    );
    assert_no_warnings(&table.notifications);
}

#[test]
fn test_dbase2_table() {
    let fields = [
        DbfField::new("CODE", b'C', 2, 0),
        DbfField::new("QTY", b'N', 4, 0),
    ];
    let rows = vec![
        dbf_row(false, &[b"AB", b"  15"]),
        dbf_row(false, &[b"CD", b"-  2"]),
    ];
    let table = dbf::decode(&dbase2_table(&fields, &rows)).unwrap();
    assert_eq!(table.header.version, DbfVersion::FoxBase);
    assert_eq!(table.header.last_update.year, 1984);
    assert_eq!(table.header.fields.len(), 2);
    assert_eq!(table.records.len(), 2);
    assert_eq!(table.records[0].get("QTY"), Some(&FieldValue::Integer(15)));
    // sign separated from the digits is not a number
    assert_eq!(table.records[1].get("QTY"), Some(&FieldValue::Null));
}

#[test]
fn test_truncated_records_fail() {
    let fields = [DbfField::new("name", b'C', 5, 0)];
    let mut bytes = dbase3_table(0x03, 0, &fields, &[dbf_row(false, &[b"HELLO"])]);
    bytes.truncate(bytes.len() - 4);
    assert!(matches!(
        dbf::decode(&bytes),
        Err(DecodeError::OutOfBounds { .. })
    ));
}

#[test]
fn test_unexpected_deleted_flag_warns() {
    let fields = [DbfField::new("name", b'C', 2, 0)];
    let mut row = dbf_row(false, &[b"ok"]);
    row[0] = b'#';
    let table = dbf::decode(&dbase3_table(0x03, 0, &fields, &[row])).unwrap();
    assert!(!table.records[0].deleted);
    assert!(table.notifications.has_type(NotificationType::Warning));
}

proptest! {
    #[test]
    fn prop_record_round_trip(
        text in "[A-Za-z0-9 ]{0,10}",
        number in -99_999i64..999_999,
        flag in proptest::option::of(any::<bool>()),
        deleted in any::<bool>(),
    ) {
        let fields = [
            DbfField::new("TEXT", b'C', 10, 0),
            DbfField::new("NUM", b'N', 6, 0),
            DbfField::new("FLAG", b'L', 1, 0),
            DbfField::new("DAY", b'D', 8, 0),
        ];
        let mut padded = text.clone().into_bytes();
        padded.resize(10, b' ');
        let number_text = format!("{:>6}", number);
        let flag_byte = match flag {
            Some(true) => b"T",
            Some(false) => b"F",
            None => b"?",
        };
        let row = dbf_row(deleted, &[padded.as_slice(), number_text.as_bytes(), flag_byte, b"19991231"]);
        let table = dbf::decode(&dbase3_table(0x03, 0, &fields, &[row.clone()])).unwrap();
        let record = &table.records[0];
        prop_assert_eq!(record.deleted, deleted);
        prop_assert_eq!(record.get("NUM"), Some(&FieldValue::Integer(number)));
        prop_assert_eq!(record.get("FLAG"), Some(&FieldValue::Logical(flag)));

        let encoded = record
            .encode(&table.header.fields, encoding_rs::WINDOWS_1252)
            .unwrap();
        prop_assert_eq!(&encoded, &row);

        let again = dbf::decode(&dbase3_table(0x03, 0, &fields, &[encoded])).unwrap();
        prop_assert_eq!(&again.records[0], record);
    }
}
