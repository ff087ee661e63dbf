use chrono::Utc;
use serde_json::{json, Value};

use crate::db::models::{Interaction, Question, Student};
use crate::record::{build_interaction, Submission};

pub fn sample_student(name: &str, group: &str) -> Student {
    Student {
        name: name.to_string(),
        group: group.to_string(),
    }
}

pub fn sample_question(url: &str, column: u32, sheet: &str, platform: &str) -> Question {
    Question {
        id: format!("q-{}", column),
        url: url.to_string(),
        column,
        sheet: sheet.to_string(),
        platform: platform.to_string(),
    }
}

/// A complete, valid submission body for the standard test fixture: two
/// attempts, 300 time units, hosted at https://git/x.
pub fn submission_body(name: &str, question_url: &str) -> Value {
    json!({
        "studentName": name,
        "attempts": 2,
        "timeTaken": 300,
        "gitUrl": "https://git/x",
        "questionUrl": question_url,
        "platform": "leetcode",
    })
}

pub fn sample_submission(name: &str, question_url: &str) -> Submission {
    Submission::from_json(&submission_body(name, question_url))
        .expect("sample submission is valid")
}

pub fn sample_interaction(name: &str, column: u32) -> Interaction {
    let student = sample_student(name, "G1");
    let question = sample_question("https://q/1", column, "Week1", "LeetCode");
    let submission = sample_submission(name, "https://q/1");
    build_interaction(&student, &question, &submission, Utc::now())
}
