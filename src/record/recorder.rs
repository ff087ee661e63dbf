use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::backup::{BackupChannel, BackupError};
use crate::db::models::{field_text, Interaction, Question, Student};
use crate::db::Database;
use crate::record::error::{MirrorError, RecordError};
use crate::record::submission::Submission;
use crate::sheets::cell::CellRef;
use crate::sheets::error::SheetError;
use crate::sheets::SheetService;

/// What happened to one submission. The interaction is durably stored by the
/// time this exists; mirror and backup report their own outcomes so callers
/// can log or assert on them without them ever failing the request.
#[derive(Debug)]
pub struct RecordOutcome {
    pub interaction: Interaction,
    pub mirror: Result<(), MirrorError>,
    pub backup: Result<(), BackupError>,
}

/// Derive the canonical interaction record from its resolved parts. Pure
/// except for the injected timestamp.
pub fn build_interaction(
    student: &Student,
    question: &Question,
    submission: &Submission,
    now: DateTime<Utc>,
) -> Interaction {
    Interaction {
        column: question.column,
        group: student.group.clone(),
        id: format!("{} | {}", student.name, question.column),
        sheet: question.sheet.clone(),
        attempts: submission.attempts.clone(),
        person: student.name.clone(),
        question_fkey: question.id.clone(),
        time_spent: submission.time_taken.clone(),
        updated_at: now,
    }
}

/// Orchestrates the recording workflow: resolve the submission against the
/// directories, persist the derived interaction, then project it into the
/// spreadsheet and the backup channel on a best-effort basis.
pub struct Recorder<D, S, B> {
    database: Arc<D>,
    sheets: Arc<S>,
    backup: Arc<B>,
    mirror_timeout: Duration,
}

impl<D: Database, S: SheetService, B: BackupChannel> Recorder<D, S, B> {
    pub fn new(
        database: Arc<D>,
        sheets: Arc<S>,
        backup: Arc<B>,
        mirror_timeout: Duration,
    ) -> Self {
        Recorder {
            database,
            sheets,
            backup,
            mirror_timeout,
        }
    }

    /// Process one validated submission. Lookup failures and the durable
    /// write failure reject the request; once the insert has succeeded the
    /// result is Ok no matter what the mirror or backup do.
    pub async fn record(&self, submission: Submission) -> Result<RecordOutcome, RecordError> {
        let student = self
            .database
            .find_student(&submission.student_name)
            .await?
            .ok_or_else(|| RecordError::UnknownStudent(submission.student_name.clone()))?;

        let question = self
            .database
            .find_question(&submission.question_url)
            .await?
            .ok_or_else(|| RecordError::UnknownQuestion(submission.question_url.clone()))?;

        let interaction = build_interaction(&student, &question, &submission, Utc::now());

        self.database.insert_interaction(&interaction).await?;
        info!("Persisted interaction {}", interaction.id);

        // The insert above is the commit point. Nothing below may fail the
        // request.
        let backup = match self.backup.submit(&interaction).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("Backup submission failed for {}: {}", interaction.id, e);
                Err(e)
            }
        };

        let mirror = match timeout(
            self.mirror_timeout,
            self.mirror(&student, &question, &submission),
        )
        .await
        {
            Ok(Ok(())) => {
                debug!("Mirrored interaction {}", interaction.id);
                Ok(())
            }
            Ok(Err(e)) => {
                warn!("Mirror failed for {}: {}", interaction.id, e);
                Err(MirrorError::Sheet(e))
            }
            Err(_) => {
                warn!(
                    "Mirror for {} timed out after {:?}",
                    interaction.id, self.mirror_timeout
                );
                Err(MirrorError::Timeout)
            }
        };

        Ok(RecordOutcome {
            interaction,
            mirror,
            backup,
        })
    }

    /// Project a submission into the spreadsheet: a hyperlinked attempt
    /// count in the question's column and the time spent next to it, both on
    /// the student's roster row.
    async fn mirror(
        &self,
        student: &Student,
        question: &Question,
        submission: &Submission,
    ) -> Result<(), SheetError> {
        let roster = self.sheets.first_column(&question.sheet).await?;

        let row = roster
            .iter()
            .position(|name| name == &student.name)
            .map(|index| index as u32 + 1)
            .ok_or_else(|| SheetError::RowNotFound(student.name.clone()))?;

        let answer_cell = CellRef::new(question.column, row);
        let time_cell = CellRef::new(question.column + 1, row);

        let link = format!(
            "=HYPERLINK(\"{}\", \"{}\")",
            submission.git_url,
            field_text(&submission.attempts)
        );

        self.sheets
            .write_cell(&question.sheet, &answer_cell, &link)
            .await?;
        self.sheets
            .align_right(&question.sheet, &answer_cell)
            .await?;
        self.sheets
            .write_cell(
                &question.sheet,
                &time_cell,
                &field_text(&submission.time_taken),
            )
            .await?;
        self.sheets.align_right(&question.sheet, &time_cell).await?;

        Ok(())
    }
}
