use crate::config::SheetsConfig;
use crate::sheets::cell::CellRef;
use crate::sheets::error::SheetError;
use crate::sheets::sheet::SheetService;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

/// Real Google Sheets implementation of the SheetService trait, speaking the
/// v4 REST API with a bearer token.
#[derive(Clone)]
pub struct GoogleSheets {
    client: reqwest::Client,
    api_base: Url,
    spreadsheet_id: String,
    token: String,
    /// Worksheet title -> numeric sheet id, needed for formatting requests.
    sheet_ids: Arc<Mutex<lru::LruCache<String, i64>>>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    #[serde(rename = "sheetId")]
    sheet_id: i64,
    title: String,
}

/// A1 range covering a whole worksheet column or a single cell, with the
/// worksheet title quoted so spaces survive.
fn quoted_range(sheet: &str, suffix: &str) -> String {
    format!("'{}'!{}", sheet.replace('\'', "''"), suffix)
}

impl GoogleSheets {
    pub fn new(config: &SheetsConfig) -> Result<Self, SheetError> {
        let api_base = Url::parse(&config.api_base)
            .map_err(|e| SheetError::Request(format!("Invalid API base URL: {}", e)))?;
        if api_base.cannot_be_a_base() {
            return Err(SheetError::Request(format!(
                "API base URL cannot carry a path: {}",
                config.api_base
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SheetError::Request(e.to_string()))?;

        let cache_size = NonZeroUsize::new(32).expect("nonzero cache size");
        let sheet_ids = Arc::new(Mutex::new(lru::LruCache::new(cache_size)));

        info!(
            "Created sheet client for spreadsheet {}",
            config.spreadsheet_id
        );

        Ok(GoogleSheets {
            client,
            api_base,
            spreadsheet_id: config.spreadsheet_id.clone(),
            token: config.token.clone(),
            sheet_ids,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .expect("base URL validated in constructor");
            path.extend(segments);
        }
        url
    }

    async fn fail_from(&self, response: reqwest::Response) -> SheetError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        SheetError::Api(status, body)
    }

    /// Resolve a worksheet title to its numeric id, caching the result.
    async fn sheet_id(&self, sheet: &str) -> Result<i64, SheetError> {
        {
            let mut cache = self.sheet_ids.lock().await;
            if let Some(id) = cache.get(sheet) {
                debug!("Cache hit for worksheet id: {}", sheet);
                return Ok(*id);
            }
        }

        let mut url = self.endpoint(&["v4", "spreadsheets", &self.spreadsheet_id]);
        url.query_pairs_mut().append_pair("fields", "sheets.properties");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SheetError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.fail_from(response).await);
        }

        let meta: SpreadsheetMeta = response
            .json()
            .await
            .map_err(|e| SheetError::Request(e.to_string()))?;

        let mut cache = self.sheet_ids.lock().await;
        for entry in &meta.sheets {
            cache.put(entry.properties.title.clone(), entry.properties.sheet_id);
        }

        cache
            .get(sheet)
            .copied()
            .ok_or_else(|| SheetError::UnknownSheet(sheet.to_string()))
    }
}

#[async_trait]
impl SheetService for GoogleSheets {
    async fn first_column(&self, sheet: &str) -> Result<Vec<String>, SheetError> {
        debug!("Fetching roster column for worksheet: {}", sheet);

        let range = quoted_range(sheet, "A:A");
        let mut url = self.endpoint(&["v4", "spreadsheets", &self.spreadsheet_id, "values", &range]);
        url.query_pairs_mut().append_pair("majorDimension", "COLUMNS");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| SheetError::Request(e.to_string()))?;

        // The API reports an unknown worksheet title as a range parse failure.
        if response.status().as_u16() == 400 {
            return Err(SheetError::UnknownSheet(sheet.to_string()));
        }
        if !response.status().is_success() {
            return Err(self.fail_from(response).await);
        }

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| SheetError::Request(e.to_string()))?;

        Ok(range.values.into_iter().next().unwrap_or_default())
    }

    async fn write_cell(
        &self,
        sheet: &str,
        cell: &CellRef,
        value: &str,
    ) -> Result<(), SheetError> {
        debug!("Writing cell {} on worksheet {}", cell, sheet);

        let range = quoted_range(sheet, &cell.to_string());
        let mut url = self.endpoint(&["v4", "spreadsheets", &self.spreadsheet_id, "values", &range]);
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": [[value]],
        });

        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.fail_from(response).await);
        }

        debug!("Successfully wrote cell {} on {}", cell, sheet);
        Ok(())
    }

    async fn align_right(&self, sheet: &str, cell: &CellRef) -> Result<(), SheetError> {
        let sheet_id = self.sheet_id(sheet).await?;

        let url = self.endpoint(&[
            "v4",
            "spreadsheets",
            &format!("{}:batchUpdate", self.spreadsheet_id),
        ]);

        let body = json!({
            "requests": [{
                "repeatCell": {
                    "range": {
                        "sheetId": sheet_id,
                        "startRowIndex": cell.row - 1,
                        "endRowIndex": cell.row,
                        "startColumnIndex": cell.column - 1,
                        "endColumnIndex": cell.column,
                    },
                    "cell": {
                        "userEnteredFormat": { "horizontalAlignment": "RIGHT" }
                    },
                    "fields": "userEnteredFormat.horizontalAlignment",
                }
            }]
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.fail_from(response).await);
        }

        Ok(())
    }
}
