use crate::db::{Database, FakeDatabase};
use crate::test_utils::{sample_interaction, sample_question, sample_student};

#[tokio::test]
async fn find_student_is_exact_and_case_sensitive() {
    let db = FakeDatabase::new();
    db.fake_add_student(sample_student("Alice", "G1"));

    let found = db.find_student("Alice").await.unwrap();
    assert_eq!(found.unwrap().group, "G1");

    assert!(db.find_student("alice").await.unwrap().is_none());
    assert!(db.find_student("Ali").await.unwrap().is_none());
}

#[tokio::test]
async fn find_question_matches_url_exactly() {
    let db = FakeDatabase::new();
    db.fake_add_question(sample_question("https://q/1", 3, "Week1", "LeetCode"));

    let found = db.find_question("https://q/1").await.unwrap().unwrap();
    assert_eq!(found.column, 3);
    assert_eq!(found.sheet, "Week1");

    assert!(db.find_question("https://q/2").await.unwrap().is_none());
}

#[tokio::test]
async fn list_platforms_returns_distinct_sorted_labels() {
    let db = FakeDatabase::new();
    db.fake_add_question(sample_question("https://q/1", 3, "Week1", "LeetCode"));
    db.fake_add_question(sample_question("https://q/2", 5, "Week1", "Codeforces"));
    db.fake_add_question(sample_question("https://q/3", 7, "Week2", "LeetCode"));

    let platforms = db.list_platforms().await.unwrap();
    assert_eq!(platforms, vec!["Codeforces", "LeetCode"]);
}

#[tokio::test]
async fn platform_query_is_case_insensitive_substring() {
    let db = FakeDatabase::new();
    db.fake_add_question(sample_question("https://q/1", 3, "Week1", "LeetCode"));
    db.fake_add_question(sample_question("https://q/2", 5, "Week1", "Codeforces"));

    let matched = db.questions_for_platform("leet").await.unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].url, "https://q/1");

    let matched = db.questions_for_platform("CODE").await.unwrap();
    assert_eq!(matched.len(), 2);

    assert!(db.questions_for_platform("atcoder").await.unwrap().is_empty());
}

#[tokio::test]
async fn identical_interactions_are_stored_twice() {
    let db = FakeDatabase::new();
    let interaction = sample_interaction("Alice", 3);

    db.insert_interaction(&interaction).await.unwrap();
    db.insert_interaction(&interaction).await.unwrap();

    let stored = db.fake_interactions();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].id, stored[1].id);
}

#[tokio::test]
async fn insert_failure_records_nothing() {
    let db = FakeDatabase::new();
    db.fake_fail_inserts(true);

    let result = db.insert_interaction(&sample_interaction("Alice", 3)).await;
    assert!(result.is_err());
    assert!(db.fake_interactions().is_empty());
}
