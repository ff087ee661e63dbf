use crate::config::DatabaseConfig;
use crate::db::database::Database;
use crate::db::error::DatabaseError;
use crate::db::models::{Interaction, Question, Student};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use tracing::{debug, error, info};

const PEOPLE_COLLECTION: &str = "People";
const QUESTIONS_COLLECTION: &str = "Questions";
const INTERACTIONS_COLLECTION: &str = "Interactions";

/// MongoDB implementation of the Database trait
pub struct MongoDatabase {
    database: mongodb::Database,
}

impl MongoDatabase {
    /// Connect to MongoDB and verify the deployment is reachable.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let options = ClientOptions::parse(&config.url).await.map_err(|e| {
            error!("Invalid MongoDB connection string: {}", e);
            DatabaseError::Connection(e.to_string())
        })?;

        let client = Client::with_options(options).map_err(|e| {
            error!("Failed to create MongoDB client: {}", e);
            DatabaseError::Connection(e.to_string())
        })?;

        let database = client.database(&config.name);

        // Connectivity test; the client itself connects lazily.
        database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                error!("Database connectivity test failed: {}", e);
                DatabaseError::Connection(format!("Database is not accessible: {}", e))
            })?;

        info!("MongoDB connection established successfully");
        Ok(MongoDatabase { database })
    }

    fn people(&self) -> Collection<Student> {
        self.database.collection(PEOPLE_COLLECTION)
    }

    fn questions(&self) -> Collection<Question> {
        self.database.collection(QUESTIONS_COLLECTION)
    }

    fn interactions(&self) -> Collection<Interaction> {
        self.database.collection(INTERACTIONS_COLLECTION)
    }
}

#[async_trait]
impl Database for MongoDatabase {
    async fn find_student(&self, name: &str) -> Result<Option<Student>, DatabaseError> {
        debug!("Looking up student: {}", name);

        self.people()
            .find_one(doc! { "Name": name }, None)
            .await
            .map_err(|e| {
                error!("Student lookup failed: {}", e);
                DatabaseError::Query(e.to_string())
            })
    }

    async fn find_question(&self, url: &str) -> Result<Option<Question>, DatabaseError> {
        debug!("Looking up question: {}", url);

        self.questions()
            .find_one(doc! { "URL": url }, None)
            .await
            .map_err(|e| {
                error!("Question lookup failed: {}", e);
                DatabaseError::Query(e.to_string())
            })
    }

    async fn list_platforms(&self) -> Result<Vec<String>, DatabaseError> {
        debug!("Listing distinct platforms");

        let values = self
            .questions()
            .distinct("Platform", None, None)
            .await
            .map_err(|e| {
                error!("Platform listing failed: {}", e);
                DatabaseError::Query(e.to_string())
            })?;

        let mut platforms: Vec<String> = values
            .into_iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect();
        platforms.sort();

        Ok(platforms)
    }

    async fn questions_for_platform(
        &self,
        fragment: &str,
    ) -> Result<Vec<Question>, DatabaseError> {
        debug!("Querying questions for platform fragment: {}", fragment);

        let filter = doc! {
            "Platform": { "$regex": fragment, "$options": "i" }
        };

        let cursor = self.questions().find(filter, None).await.map_err(|e| {
            error!("Question query failed: {}", e);
            DatabaseError::Query(e.to_string())
        })?;

        let questions: Vec<Question> = cursor.try_collect().await.map_err(|e| {
            error!("Failed to read question documents: {}", e);
            DatabaseError::Document(e.to_string())
        })?;

        info!(
            "Found {} questions for platform fragment '{}'",
            questions.len(),
            fragment
        );
        Ok(questions)
    }

    async fn insert_interaction(&self, interaction: &Interaction) -> Result<(), DatabaseError> {
        debug!("Inserting interaction: {}", interaction.id);

        self.interactions()
            .insert_one(interaction, None)
            .await
            .map_err(|e| {
                error!("Failed to insert interaction: {}", e);
                DatabaseError::Query(e.to_string())
            })?;

        info!("Recorded interaction {}", interaction.id);
        Ok(())
    }
}
