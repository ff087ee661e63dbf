use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::backup::BackupChannel;
use crate::db::Database;
use crate::http::AppState;
use crate::sheets::SheetService;

#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    pub code: Option<String>,
}

/// GET /authenticate: exchange a GitHub authorization code for an access
/// token and render a page embedding it. Failures of any kind render the
/// error page; this endpoint never returns a server error.
pub async fn authenticate<D, S, B>(
    State(state): State<AppState<D, S, B>>,
    Query(query): Query<AuthQuery>,
) -> Html<String>
where
    D: Database,
    S: SheetService,
    B: BackupChannel,
{
    let Some(code) = query.code else {
        warn!("Authentication request without a code parameter");
        return error_page();
    };

    let response = state
        .http
        .post(&state.github.token_url)
        .form(&[
            ("client_id", state.github.client_id.as_str()),
            ("client_secret", state.github.client_secret.as_str()),
            ("code", code.as_str()),
        ])
        .send()
        .await;

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            warn!("Token exchange request failed: {}", e);
            return error_page();
        }
    };

    if !response.status().is_success() {
        warn!("Token endpoint returned status {}", response.status());
        return error_page();
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to read token response: {}", e);
            return error_page();
        }
    };

    // The token endpoint answers with a form-encoded body such as
    // access_token=...&scope=...&token_type=bearer
    let access_token = form_urlencoded::parse(body.as_bytes())
        .find(|(key, _)| key == "access_token")
        .map(|(_, value)| value.trim().to_string());

    match access_token {
        Some(token) if !token.is_empty() => {
            debug!("Token exchange succeeded");
            token_page(&token)
        }
        _ => {
            warn!("Token response did not contain an access token");
            error_page()
        }
    }
}

fn token_page(token: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<body>\n\
         <input type='hidden' value='{}' id='access_token'>\n\
         <p>Successfully authenticated!</p>\n\
         </body>\n</html>",
        token
    ))
}

fn error_page() -> Html<String> {
    Html(
        "<!DOCTYPE html>\n<html>\n<body>\n\
         <p>Authentication failed!</p>\n\
         </body>\n</html>"
            .to_string(),
    )
}
