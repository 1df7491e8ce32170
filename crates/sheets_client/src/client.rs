use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::auth::{AccessTokenSource, ServiceAccountAuth, ServiceAccountKey};
use crate::error::{Result, SheetsError};

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4";

#[derive(Deserialize)]
struct SpreadsheetMetadata {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Serialize)]
struct ValueRangeUpdate<'a> {
    range: &'a str,
    #[serde(rename = "majorDimension")]
    major_dimension: &'static str,
    values: Vec<Vec<String>>,
}

/// Client for one spreadsheet. Reads and writes a single worksheet: the one
/// named at construction, or the first one in the spreadsheet.
pub struct SheetsClient {
    http: Arc<ClientWithMiddleware>,
    api_base: String,
    spreadsheet_id: String,
    auth: Arc<dyn AccessTokenSource>,
    sheet_title: OnceCell<String>,
}

impl SheetsClient {
    pub fn new(spreadsheet_id: impl Into<String>, auth: Arc<dyn AccessTokenSource>) -> Self {
        Self::with_http_client(spreadsheet_id, auth, shared_http_client())
    }

    /// Build a client authenticated with a service-account JSON key.
    pub fn from_service_account(
        spreadsheet_id: impl Into<String>,
        credentials_json: &str,
    ) -> Result<Self> {
        let http = shared_http_client();
        let key = ServiceAccountKey::from_json(credentials_json)?;
        let auth = ServiceAccountAuth::new(http.clone(), key)?;
        info!("Using service account {}", auth.client_email());
        Ok(Self::with_http_client(spreadsheet_id, Arc::new(auth), http))
    }

    fn with_http_client(
        spreadsheet_id: impl Into<String>,
        auth: Arc<dyn AccessTokenSource>,
        http: Arc<ClientWithMiddleware>,
    ) -> Self {
        Self {
            http,
            api_base: DEFAULT_API_BASE.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            auth,
            sheet_title: OnceCell::new(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Use this worksheet instead of looking up the first one.
    pub fn with_sheet_title(mut self, title: impl Into<String>) -> Self {
        self.sheet_title = OnceCell::new_with(Some(title.into()));
        self
    }

    pub async fn sheet_title(&self) -> Result<&str> {
        self.sheet_title
            .get_or_try_init(|| self.first_sheet_title())
            .await
            .map(String::as_str)
    }

    async fn first_sheet_title(&self) -> Result<String> {
        let mut url = self.spreadsheet_url(&[])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");

        let metadata: SpreadsheetMetadata = self.get_json(url).await?;
        let title = metadata
            .sheets
            .into_iter()
            .next()
            .map(|sheet| sheet.properties.title)
            .ok_or(SheetsError::NoWorksheet)?;
        info!("Using worksheet {:?}", title);
        Ok(title)
    }

    /// Every non-empty row of the worksheet, header row included, as text.
    pub async fn get_values(&self) -> Result<Vec<Vec<String>>> {
        let range = quote_sheet(self.sheet_title().await?);
        let url = self.spreadsheet_url(&["values", range.as_str()])?;

        let values: ValueRange = self.get_json(url).await?;
        debug!("Fetched {} rows from {}", values.values.len(), range);

        Ok(values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }

    /// Write one row of `values` starting at the 1-based `row`/`column`.
    pub async fn update_row(&self, row: u32, column: u32, values: Vec<String>) -> Result<()> {
        let last_column = column + values.len().saturating_sub(1) as u32;
        let range = format!(
            "{}!{}{}:{}{}",
            quote_sheet(self.sheet_title().await?),
            column_letters(column),
            row,
            column_letters(last_column),
            row
        );

        let mut url = self.spreadsheet_url(&["values", range.as_str()])?;
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        let body = ValueRangeUpdate {
            range: &range,
            major_dimension: "ROWS",
            values: vec![values],
        };
        let token = self.auth.access_token().await?;
        let response = self
            .http
            .put(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        check_status(response).await?;

        debug!("Updated {}", range);
        Ok(())
    }

    fn spreadsheet_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| SheetsError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SheetsError::InvalidUrl(self.api_base.clone()))?
            .pop_if_empty()
            .push("spreadsheets")
            .push(&self.spreadsheet_id)
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let token = self.auth.access_token().await?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let body = check_status(response).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

fn shared_http_client() -> Arc<ClientWithMiddleware> {
    let retry_policy = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_millis(250), Duration::from_secs(4))
        .build_with_max_retries(3);

    Arc::new(
        ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build(),
    )
}

async fn check_status(response: reqwest::Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(SheetsError::Api {
            status: status.as_u16(),
            message: api_error_message(&body),
        });
    }
    Ok(body)
}

/// Google wraps errors as `{"error": {"message": ...}}`; fall back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Bool(b) => (if b { "TRUE" } else { "FALSE" }).to_string(),
        other => other.to_string(),
    }
}

/// `'Hoja 1'` style quoting so titles with spaces or quotes stay valid A1.
fn quote_sheet(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// 1 → A, 26 → Z, 27 → AA.
pub fn column_letters(mut column: u32) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let rem = (column - 1) % 26;
        letters.push(b'A' + rem as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
