pub mod database;
pub mod error;
pub mod fake;
pub mod models;
pub mod mongo;

pub use database::Database;
pub use error::DatabaseError;
pub use fake::FakeDatabase;
pub use models::{Interaction, Question, Student};
pub use mongo::MongoDatabase;

#[cfg(test)]
mod tests;
