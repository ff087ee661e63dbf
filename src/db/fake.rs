use crate::db::database::Database;
use crate::db::error::DatabaseError;
use crate::db::models::{Interaction, Question, Student};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A fake in-memory implementation of the Database trait for testing
#[derive(Clone)]
pub struct FakeDatabase {
    students: Arc<RwLock<HashMap<String, Student>>>,
    questions: Arc<RwLock<HashMap<String, Question>>>,
    interactions: Arc<RwLock<Vec<Interaction>>>,
    fail_inserts: Arc<RwLock<bool>>,
}

impl FakeDatabase {
    /// Create a new empty FakeDatabase
    pub fn new() -> Self {
        FakeDatabase {
            students: Arc::new(RwLock::new(HashMap::new())),
            questions: Arc::new(RwLock::new(HashMap::new())),
            interactions: Arc::new(RwLock::new(Vec::new())),
            fail_inserts: Arc::new(RwLock::new(false)),
        }
    }

    /// Add a student to the roster
    pub fn fake_add_student(&self, student: Student) {
        let mut students = self.students.write().unwrap();
        students.insert(student.name.clone(), student);
    }

    /// Add a question to the directory
    pub fn fake_add_question(&self, question: Question) {
        let mut questions = self.questions.write().unwrap();
        questions.insert(question.url.clone(), question);
    }

    /// Snapshot of every interaction inserted so far, in insertion order
    pub fn fake_interactions(&self) -> Vec<Interaction> {
        self.interactions.read().unwrap().clone()
    }

    /// Simulate insert failures. While enabled, insert_interaction returns
    /// an error and records nothing.
    pub fn fake_fail_inserts(&self, fail: bool) {
        *self.fail_inserts.write().unwrap() = fail;
    }
}

impl Default for FakeDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Database for FakeDatabase {
    async fn find_student(&self, name: &str) -> Result<Option<Student>, DatabaseError> {
        let students = self.students.read().unwrap();
        Ok(students.get(name).cloned())
    }

    async fn find_question(&self, url: &str) -> Result<Option<Question>, DatabaseError> {
        let questions = self.questions.read().unwrap();
        Ok(questions.get(url).cloned())
    }

    async fn list_platforms(&self) -> Result<Vec<String>, DatabaseError> {
        let questions = self.questions.read().unwrap();

        let mut platforms: Vec<String> = questions
            .values()
            .map(|question| question.platform.clone())
            .collect();
        platforms.sort();
        platforms.dedup();

        Ok(platforms)
    }

    async fn questions_for_platform(
        &self,
        fragment: &str,
    ) -> Result<Vec<Question>, DatabaseError> {
        let questions = self.questions.read().unwrap();
        let needle = fragment.to_lowercase();

        let mut matched: Vec<Question> = questions
            .values()
            .filter(|question| question.platform.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        // Deterministic order for assertions.
        matched.sort_by(|a, b| a.url.cmp(&b.url));

        Ok(matched)
    }

    async fn insert_interaction(&self, interaction: &Interaction) -> Result<(), DatabaseError> {
        if *self.fail_inserts.read().unwrap() {
            return Err(DatabaseError::Query(
                "Simulated insert failure".to_string(),
            ));
        }

        let mut interactions = self.interactions.write().unwrap();
        interactions.push(interaction.clone());
        Ok(())
    }
}
