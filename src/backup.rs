use crate::config::BackupConfig;
use crate::db::models::{field_text, Interaction};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when submitting to the backup channel
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Backup request failed: {0}")]
    Request(String),

    #[error("Backup endpoint returned status {0}")]
    Status(u16),
}

/// BackupChannel trait for the secondary, fire-and-forget copy of each
/// interaction. Failures are logged by the caller and never surfaced.
#[async_trait]
pub trait BackupChannel: Send + Sync + 'static {
    async fn submit(&self, interaction: &Interaction) -> Result<(), BackupError>;
}

#[async_trait]
impl<T: BackupChannel + ?Sized> BackupChannel for Arc<T> {
    async fn submit(&self, interaction: &Interaction) -> Result<(), BackupError> {
        (**self).submit(interaction).await
    }
}

/// Real backup channel that submits the interaction fields as URL parameters
/// to a form-response endpoint.
#[derive(Clone)]
pub struct FormBackup {
    client: reqwest::Client,
    form_url: String,
}

impl FormBackup {
    pub fn new(config: &BackupConfig) -> Result<Self, BackupError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| BackupError::Request(e.to_string()))?;

        Ok(FormBackup {
            client,
            form_url: config.form_url.clone(),
        })
    }
}

#[async_trait]
impl BackupChannel for FormBackup {
    async fn submit(&self, interaction: &Interaction) -> Result<(), BackupError> {
        debug!("Submitting interaction {} to backup form", interaction.id);

        // Entry ids are fixed by the form definition.
        let params = [
            ("entry.422042046", interaction.column.to_string()),
            ("entry.446153335", interaction.group.clone()),
            ("entry.1898265689", interaction.id.clone()),
            ("entry.1842990152", interaction.sheet.clone()),
            ("entry.127602", field_text(&interaction.attempts)),
            ("entry.1614409012", interaction.person.clone()),
            ("entry.1964375111", interaction.question_fkey.clone()),
            ("entry.976663908", field_text(&interaction.time_spent)),
        ];

        let response = self
            .client
            .get(&self.form_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| BackupError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BackupError::Status(response.status().as_u16()));
        }

        debug!("Backup accepted for interaction {}", interaction.id);
        Ok(())
    }
}

/// A fake in-memory backup channel for testing
#[derive(Clone)]
pub struct FakeBackup {
    submissions: Arc<Mutex<Vec<Interaction>>>,
    fail: Arc<Mutex<bool>>,
}

impl FakeBackup {
    pub fn new() -> Self {
        FakeBackup {
            submissions: Arc::new(Mutex::new(Vec::new())),
            fail: Arc::new(Mutex::new(false)),
        }
    }

    /// Every interaction submitted so far, in order
    pub fn fake_submissions(&self) -> Vec<Interaction> {
        self.submissions.lock().unwrap().clone()
    }

    /// Simulate submission failures
    pub fn fake_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

impl Default for FakeBackup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackupChannel for FakeBackup {
    async fn submit(&self, interaction: &Interaction) -> Result<(), BackupError> {
        if *self.fail.lock().unwrap() {
            return Err(BackupError::Request(
                "Simulated backup failure".to_string(),
            ));
        }

        self.submissions.lock().unwrap().push(interaction.clone());
        Ok(())
    }
}
