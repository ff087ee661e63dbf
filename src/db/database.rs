use crate::db::error::DatabaseError;
use crate::db::models::{Interaction, Question, Student};
use async_trait::async_trait;
use std::sync::Arc;

/// Database trait defining the interface to the document store: the
/// read-only student and question directories plus the insert-only
/// interaction log.
#[async_trait]
pub trait Database: Send + Sync + 'static {
    /// Look up a student by name. Exact, case-sensitive match; no fuzzy or
    /// partial matching.
    async fn find_student(&self, name: &str) -> Result<Option<Student>, DatabaseError>;

    /// Look up a question by its URL. Exact match.
    async fn find_question(&self, url: &str) -> Result<Option<Question>, DatabaseError>;

    /// Distinct platform labels across all registered questions.
    async fn list_platforms(&self) -> Result<Vec<String>, DatabaseError>;

    /// Questions whose platform contains `fragment`, matched
    /// case-insensitively.
    async fn questions_for_platform(
        &self,
        fragment: &str,
    ) -> Result<Vec<Question>, DatabaseError>;

    /// Append one interaction to the log. Never an upsert: identical
    /// submissions produce distinct records.
    async fn insert_interaction(&self, interaction: &Interaction) -> Result<(), DatabaseError>;
}

/// Implementation of Database trait for Arc<T> where T implements Database
///
/// This allows sharing a database instance across the request handlers and
/// the recorder without duplicating connections.
#[async_trait]
impl<T: Database + ?Sized> Database for Arc<T> {
    async fn find_student(&self, name: &str) -> Result<Option<Student>, DatabaseError> {
        (**self).find_student(name).await
    }

    async fn find_question(&self, url: &str) -> Result<Option<Question>, DatabaseError> {
        (**self).find_question(url).await
    }

    async fn list_platforms(&self) -> Result<Vec<String>, DatabaseError> {
        (**self).list_platforms().await
    }

    async fn questions_for_platform(
        &self,
        fragment: &str,
    ) -> Result<Vec<Question>, DatabaseError> {
        (**self).questions_for_platform(fragment).await
    }

    async fn insert_interaction(&self, interaction: &Interaction) -> Result<(), DatabaseError> {
        (**self).insert_interaction(interaction).await
    }
}
