use crate::sheets::cell::{column_to_letter, CellRef};
use crate::sheets::error::SheetError;
use crate::sheets::fake::FakeSheet;
use crate::sheets::sheet::SheetService;

#[test]
fn column_letters_follow_bijective_base_26() {
    assert_eq!(column_to_letter(1), "A");
    assert_eq!(column_to_letter(2), "B");
    assert_eq!(column_to_letter(26), "Z");
    assert_eq!(column_to_letter(27), "AA");
    assert_eq!(column_to_letter(28), "AB");
    assert_eq!(column_to_letter(52), "AZ");
    assert_eq!(column_to_letter(53), "BA");
    assert_eq!(column_to_letter(702), "ZZ");
    assert_eq!(column_to_letter(703), "AAA");
}

#[test]
fn cell_ref_renders_a1_notation() {
    assert_eq!(CellRef::new(3, 7).to_string(), "C7");
    assert_eq!(CellRef::new(27, 1).to_string(), "AA1");
}

#[tokio::test]
async fn first_column_returns_roster_in_order() {
    let sheet = FakeSheet::new();
    sheet.fake_set_roster("Week1", &["Name", "Alice", "Bob"]);

    let roster = sheet.first_column("Week1").await.unwrap();
    assert_eq!(roster, vec!["Name", "Alice", "Bob"]);
}

#[tokio::test]
async fn unknown_worksheet_is_an_error() {
    let sheet = FakeSheet::new();

    match sheet.first_column("Week9").await {
        Err(SheetError::UnknownSheet(name)) => assert_eq!(name, "Week9"),
        other => panic!("Expected UnknownSheet, got {:?}", other),
    }
}

#[tokio::test]
async fn writes_and_alignment_are_recorded() {
    let sheet = FakeSheet::new();
    sheet.fake_set_roster("Week1", &["Alice"]);

    let cell = CellRef::new(3, 1);
    sheet.write_cell("Week1", &cell, "42").await.unwrap();
    sheet.align_right("Week1", &cell).await.unwrap();

    assert_eq!(sheet.fake_cell("Week1", &cell).unwrap(), "42");
    assert_eq!(
        sheet.fake_alignments(),
        vec![("Week1".to_string(), "C1".to_string())]
    );
}

#[tokio::test]
async fn simulated_failure_blocks_writes() {
    let sheet = FakeSheet::new();
    sheet.fake_set_roster("Week1", &["Alice"]);
    sheet.fake_fail_writes(true);

    let cell = CellRef::new(1, 1);
    assert!(sheet.write_cell("Week1", &cell, "x").await.is_err());
    assert!(sheet.fake_cell("Week1", &cell).is_none());
}
