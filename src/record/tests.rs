use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::backup::FakeBackup;
use crate::db::FakeDatabase;
use crate::record::error::{MirrorError, RecordError};
use crate::record::recorder::{build_interaction, Recorder};
use crate::record::submission::{Submission, REQUIRED_FIELDS};
use crate::sheets::cell::CellRef;
use crate::sheets::error::SheetError;
use crate::sheets::FakeSheet;
use crate::test_utils::{
    sample_question, sample_student, sample_submission, submission_body,
};

/// Test environment wiring a recorder to fake collaborators
struct TestEnvironment {
    database: Arc<FakeDatabase>,
    sheets: Arc<FakeSheet>,
    backup: Arc<FakeBackup>,
    recorder: Recorder<FakeDatabase, FakeSheet, FakeBackup>,
}

impl TestEnvironment {
    fn new() -> Self {
        let database = Arc::new(FakeDatabase::new());
        let sheets = Arc::new(FakeSheet::new());
        let backup = Arc::new(FakeBackup::new());
        let recorder = Recorder::new(
            database.clone(),
            sheets.clone(),
            backup.clone(),
            Duration::from_secs(5),
        );

        TestEnvironment {
            database,
            sheets,
            backup,
            recorder,
        }
    }

    /// Seed Alice in group G1, a column-3 question on Week1, and a Week1
    /// roster where Alice sits on row 2.
    fn seed(&self) {
        self.database.fake_add_student(sample_student("Alice", "G1"));
        self.database
            .fake_add_question(sample_question("https://q/1", 3, "Week1", "LeetCode"));
        self.sheets.fake_set_roster("Week1", &["Name", "Alice", "Bob"]);
    }
}

#[tokio::test]
async fn valid_submission_persists_and_mirrors() {
    let env = TestEnvironment::new();
    env.seed();

    let outcome = env
        .recorder
        .record(sample_submission("Alice", "https://q/1"))
        .await
        .unwrap();

    assert!(outcome.mirror.is_ok());
    assert!(outcome.backup.is_ok());

    let stored = env.database.fake_interactions();
    assert_eq!(stored.len(), 1);
    let interaction = &stored[0];
    assert_eq!(interaction.column, 3);
    assert_eq!(interaction.group, "G1");
    assert_eq!(interaction.id, "Alice | 3");
    assert_eq!(interaction.sheet, "Week1");
    assert_eq!(interaction.attempts, json!(2));
    assert_eq!(interaction.person, "Alice");
    assert_eq!(interaction.question_fkey, "q-3");
    assert_eq!(interaction.time_spent, json!(300));

    // Alice is on row 2; the question column holds the hyperlinked attempt
    // count and the next column holds the time spent.
    let answer_cell = CellRef::new(3, 2);
    let time_cell = CellRef::new(4, 2);
    assert_eq!(
        env.sheets.fake_cell("Week1", &answer_cell).unwrap(),
        "=HYPERLINK(\"https://git/x\", \"2\")"
    );
    assert_eq!(env.sheets.fake_cell("Week1", &time_cell).unwrap(), "300");
    assert_eq!(
        env.sheets.fake_alignments(),
        vec![
            ("Week1".to_string(), "C2".to_string()),
            ("Week1".to_string(), "D2".to_string()),
        ]
    );

    assert_eq!(env.backup.fake_submissions().len(), 1);
    assert_eq!(env.backup.fake_submissions()[0].id, "Alice | 3");
}

#[tokio::test]
async fn unknown_student_rejects_and_persists_nothing() {
    let env = TestEnvironment::new();
    env.seed();

    let result = env
        .recorder
        .record(sample_submission("Mallory", "https://q/1"))
        .await;

    match result {
        Err(RecordError::UnknownStudent(name)) => assert_eq!(name, "Mallory"),
        other => panic!("Expected UnknownStudent, got {:?}", other),
    }
    assert!(env.database.fake_interactions().is_empty());
    assert_eq!(env.sheets.fake_write_count(), 0);
    assert!(env.backup.fake_submissions().is_empty());
}

#[tokio::test]
async fn unknown_question_rejects_and_persists_nothing() {
    let env = TestEnvironment::new();
    env.seed();

    let result = env
        .recorder
        .record(sample_submission("Alice", "https://q/404"))
        .await;

    match result {
        Err(RecordError::UnknownQuestion(url)) => assert_eq!(url, "https://q/404"),
        other => panic!("Expected UnknownQuestion, got {:?}", other),
    }
    assert!(env.database.fake_interactions().is_empty());
    assert_eq!(env.sheets.fake_write_count(), 0);
}

#[tokio::test]
async fn duplicate_submissions_create_two_records() {
    let env = TestEnvironment::new();
    env.seed();

    env.recorder
        .record(sample_submission("Alice", "https://q/1"))
        .await
        .unwrap();
    env.recorder
        .record(sample_submission("Alice", "https://q/1"))
        .await
        .unwrap();

    let stored = env.database.fake_interactions();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, "Alice | 3");
    assert_eq!(stored[1].id, "Alice | 3");
}

#[tokio::test]
async fn mirror_failure_does_not_fail_the_request() {
    let env = TestEnvironment::new();
    env.seed();
    env.sheets.fake_fail_writes(true);

    let outcome = env
        .recorder
        .record(sample_submission("Alice", "https://q/1"))
        .await
        .unwrap();

    assert_eq!(env.database.fake_interactions().len(), 1);
    assert!(matches!(outcome.mirror, Err(MirrorError::Sheet(_))));
}

#[tokio::test]
async fn missing_roster_row_is_swallowed() {
    let env = TestEnvironment::new();
    env.seed();
    env.sheets.fake_set_roster("Week1", &["Name", "Bob"]);

    let outcome = env
        .recorder
        .record(sample_submission("Alice", "https://q/1"))
        .await
        .unwrap();

    assert_eq!(env.database.fake_interactions().len(), 1);
    match outcome.mirror {
        Err(MirrorError::Sheet(SheetError::RowNotFound(name))) => assert_eq!(name, "Alice"),
        other => panic!("Expected RowNotFound, got {:?}", other),
    }
    assert_eq!(env.sheets.fake_write_count(), 0);
}

#[tokio::test]
async fn roster_match_is_case_sensitive() {
    let env = TestEnvironment::new();
    env.seed();
    env.sheets.fake_set_roster("Week1", &["ALICE", "alice"]);

    let outcome = env
        .recorder
        .record(sample_submission("Alice", "https://q/1"))
        .await
        .unwrap();

    assert!(matches!(
        outcome.mirror,
        Err(MirrorError::Sheet(SheetError::RowNotFound(_)))
    ));
}

#[tokio::test]
async fn unknown_worksheet_is_swallowed() {
    let env = TestEnvironment::new();
    env.database.fake_add_student(sample_student("Alice", "G1"));
    env.database
        .fake_add_question(sample_question("https://q/1", 3, "Week9", "LeetCode"));
    // No roster defined for Week9.

    let outcome = env
        .recorder
        .record(sample_submission("Alice", "https://q/1"))
        .await
        .unwrap();

    assert_eq!(env.database.fake_interactions().len(), 1);
    assert!(matches!(
        outcome.mirror,
        Err(MirrorError::Sheet(SheetError::UnknownSheet(_)))
    ));
}

#[tokio::test]
async fn storage_failure_rejects_before_any_projection() {
    let env = TestEnvironment::new();
    env.seed();
    env.database.fake_fail_inserts(true);

    let result = env
        .recorder
        .record(sample_submission("Alice", "https://q/1"))
        .await;

    assert!(matches!(result, Err(RecordError::Storage(_))));
    assert_eq!(env.sheets.fake_write_count(), 0);
    assert!(env.backup.fake_submissions().is_empty());
}

#[tokio::test]
async fn backup_failure_does_not_fail_the_request() {
    let env = TestEnvironment::new();
    env.seed();
    env.backup.fake_fail(true);

    let outcome = env
        .recorder
        .record(sample_submission("Alice", "https://q/1"))
        .await
        .unwrap();

    assert!(outcome.backup.is_err());
    assert!(outcome.mirror.is_ok());
    assert_eq!(env.database.fake_interactions().len(), 1);
}

#[test]
fn each_missing_field_is_reported_by_name() {
    for field in REQUIRED_FIELDS {
        let mut body = submission_body("Alice", "https://q/1");
        body.as_object_mut().unwrap().remove(field);

        match Submission::from_json(&body) {
            Err(RecordError::MissingField(name)) => assert_eq!(name, field),
            other => panic!("Expected MissingField({}), got {:?}", field, other),
        }
    }
}

#[test]
fn non_object_body_reports_the_first_field() {
    match Submission::from_json(&json!([1, 2, 3])) {
        Err(RecordError::MissingField(name)) => assert_eq!(name, "studentName"),
        other => panic!("Expected MissingField, got {:?}", other),
    }
}

#[test]
fn string_and_numeric_values_are_both_accepted() {
    let body = json!({
        "studentName": "Alice",
        "attempts": "two",
        "timeTaken": 300,
        "gitUrl": "https://git/x",
        "questionUrl": "https://q/1",
        "platform": "leetcode",
    });

    let submission = Submission::from_json(&body).unwrap();
    assert_eq!(submission.attempts, json!("two"));
    assert_eq!(submission.time_taken, json!(300));
}

#[test]
fn derived_id_preserves_separator_and_order() {
    let student = sample_student("Alice", "G1");
    let question = sample_question("https://q/1", 3, "Week1", "LeetCode");
    let submission = sample_submission("Alice", "https://q/1");
    let now = Utc::now();

    let interaction = build_interaction(&student, &question, &submission, now);
    assert_eq!(interaction.id, "Alice | 3");
    assert_eq!(interaction.question_fkey, question.id);
    assert_eq!(interaction.updated_at, now);

    // Deterministic given the same timestamp.
    let again = build_interaction(&student, &question, &submission, now);
    assert_eq!(interaction, again);
}
