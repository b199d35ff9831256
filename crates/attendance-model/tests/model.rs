use attendance_model::{
    AttendanceColumns, AttendanceStatus, AttendanceTally, CellValue, HEADER_MARKER, Table,
};

#[test]
fn cell_value_serializes_with_kind_tag() {
    let json = serde_json::to_string(&CellValue::text("x")).expect("serialize cell");
    assert_eq!(json, r#"{"kind":"Text","value":"x"}"#);
    let missing = serde_json::to_string(&CellValue::Missing).expect("serialize missing");
    assert_eq!(missing, r#"{"kind":"Missing"}"#);
}

#[test]
fn table_round_trips_through_json() {
    let table = Table::from_rows(
        vec![HEADER_MARKER.to_string(), "w1".to_string()],
        vec![vec!["Ahmed".into(), CellValue::Number(1.0)]],
    );
    let json = serde_json::to_string(&table).expect("serialize table");
    let round: Table = serde_json::from_str(&json).expect("deserialize table");
    assert_eq!(round, table);
}

#[test]
fn tally_serializes_counts() {
    let mut tally = AttendanceTally::default();
    tally.record(AttendanceStatus::Moderate);
    let value = serde_json::to_value(tally).expect("serialize tally");
    assert_eq!(value["total"], 1);
    assert_eq!(value["moderate"], 1);
}

#[test]
fn attendance_columns_deserialize_from_list() {
    let columns: AttendanceColumns =
        serde_json::from_str(r#"["w1","w2"]"#).expect("deserialize columns");
    assert_eq!(columns.as_slice(), ["w1".to_string(), "w2".to_string()]);
}
