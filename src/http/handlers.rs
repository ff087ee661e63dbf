use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::error;

use crate::backup::BackupChannel;
use crate::db::Database;
use crate::http::AppState;
use crate::record::{RecordError, Submission};
use crate::sheets::SheetService;

/// POST /api: validate, record and mirror one practice submission.
/// Mirror and backup outcomes are logged inside the recorder and never
/// change the response.
pub async fn submit<D, S, B>(
    State(state): State<AppState<D, S, B>>,
    Json(body): Json<Value>,
) -> Response
where
    D: Database,
    S: SheetService,
    B: BackupChannel,
{
    let submission = match Submission::from_json(&body) {
        Ok(submission) => submission,
        Err(e) => return rejection(e),
    };

    match state.recorder.record(submission).await {
        Ok(_outcome) => (StatusCode::OK, Json(json!({ "status": "OK" }))).into_response(),
        Err(e) => rejection(e),
    }
}

fn rejection(error: RecordError) -> Response {
    let (status, message) = match &error {
        RecordError::MissingField(field) => {
            (StatusCode::BAD_REQUEST, format!("{} not found", field))
        }
        RecordError::UnknownStudent(_) => (
            StatusCode::BAD_REQUEST,
            "Please check your name.".to_string(),
        ),
        RecordError::UnknownQuestion(_) => (
            StatusCode::BAD_REQUEST,
            "This question is not found on the google sheet.".to_string(),
        ),
        RecordError::Storage(e) => {
            error!("Storage failure while recording submission: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    };

    (status, Json(json!({ "status": message }))).into_response()
}

/// GET /api/platform: the distinct platform labels across all questions.
pub async fn platforms<D, S, B>(State(state): State<AppState<D, S, B>>) -> Response
where
    D: Database,
    S: SheetService,
    B: BackupChannel,
{
    match state.database.list_platforms().await {
        Ok(platforms) => (
            StatusCode::OK,
            Json(json!({ "status": 200, "platforms": platforms })),
        )
            .into_response(),
        Err(e) => {
            error!("Platform listing failed: {}", e);
            internal_error()
        }
    }
}

/// GET /api/platform/{platform}/question: questions whose platform contains
/// the given fragment, matched case-insensitively.
pub async fn platform_questions<D, S, B>(
    State(state): State<AppState<D, S, B>>,
    Path(platform): Path<String>,
) -> Response
where
    D: Database,
    S: SheetService,
    B: BackupChannel,
{
    match state.database.questions_for_platform(&platform).await {
        Ok(questions) => (
            StatusCode::OK,
            Json(json!({ "status": 200, "questions": questions })),
        )
            .into_response(),
        Err(e) => {
            error!("Question query failed for platform '{}': {}", platform, e);
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "status": "internal error" })),
    )
        .into_response()
}
