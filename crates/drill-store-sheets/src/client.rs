//! Thin async wrapper over the Sheets v4 REST endpoints the store needs.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{Error, Result, config::SheetsConfig};

/// Rows and columns given to a worksheet created by the store.
const NEW_SHEET_ROWS: u32 = 1000;
const NEW_SHEET_COLUMNS: u32 = 20;

#[derive(Deserialize)]
struct SpreadsheetMeta {
  #[serde(default)]
  sheets: Vec<SheetMeta>,
}

#[derive(Deserialize)]
struct SheetMeta {
  properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
  title: String,
}

#[derive(Deserialize)]
struct ValueRange {
  /// Omitted by the API when the range is empty.
  #[serde(default)]
  values: Vec<Vec<Value>>,
}

/// Async HTTP client for one spreadsheet.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct SheetsClient {
  client: Client,
  config: SheetsConfig,
}

impl SheetsClient {
  pub fn new(config: SheetsConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  pub fn config(&self) -> &SheetsConfig { &self.config }

  /// `<api_base>/spreadsheets/<id>/<segments...>`, each segment escaped.
  pub fn url(&self, segments: &[&str]) -> Result<Url> {
    let base = self.config.api_base.trim_end_matches('/');
    let mut url =
      Url::parse(base).map_err(|_| Error::BaseUrl(self.config.api_base.clone()))?;
    url
      .path_segments_mut()
      .map_err(|()| Error::BaseUrl(self.config.api_base.clone()))?
      .pop_if_empty()
      .push("spreadsheets")
      .push(&self.config.spreadsheet_id)
      .extend(segments);
    Ok(url)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    if self.config.access_token.is_empty() {
      req
    } else {
      req.bearer_auth(&self.config.access_token)
    }
  }

  async fn send(&self, operation: &'static str, req: RequestBuilder) -> Result<Response> {
    let resp = self.auth(req).send().await?;
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Status { operation, status, body })
  }

  // ── Worksheets ────────────────────────────────────────────────────────────

  /// `GET /spreadsheets/<id>?fields=sheets.properties.title`
  pub async fn worksheet_titles(&self) -> Result<Vec<String>> {
    let url = self.url(&[])?;
    let resp = self
      .send(
        "GET spreadsheet",
        self
          .client
          .get(url)
          .query(&[("fields", "sheets.properties.title")]),
      )
      .await?;
    let meta: SpreadsheetMeta = resp.json().await?;
    Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
  }

  /// `POST /spreadsheets/<id>:batchUpdate` with a single `addSheet` request.
  pub async fn add_worksheet(&self, title: &str) -> Result<()> {
    let mut url = self.url(&[])?;
    let path = format!("{}:batchUpdate", url.path());
    url.set_path(&path);

    let body = json!({
      "requests": [{
        "addSheet": {
          "properties": {
            "title": title,
            "gridProperties": {
              "rowCount": NEW_SHEET_ROWS,
              "columnCount": NEW_SHEET_COLUMNS,
            },
          },
        },
      }],
    });
    self
      .send("POST batchUpdate", self.client.post(url).json(&body))
      .await?;
    Ok(())
  }

  // ── Values ────────────────────────────────────────────────────────────────

  /// `GET /spreadsheets/<id>/values/<range>`
  pub async fn read_values(&self, range: &str) -> Result<Vec<Vec<Value>>> {
    let url = self.url(&["values", range])?;
    let resp = self.send("GET values", self.client.get(url)).await?;
    let body: ValueRange = resp.json().await?;
    Ok(body.values)
  }

  /// `POST /spreadsheets/<id>/values/<range>:clear`
  pub async fn clear_values(&self, range: &str) -> Result<()> {
    let url = self.url(&["values", &format!("{range}:clear")])?;
    self
      .send("POST values:clear", self.client.post(url).json(&json!({})))
      .await?;
    Ok(())
  }

  /// `PUT /spreadsheets/<id>/values/<range>?valueInputOption=RAW`
  pub async fn write_values(&self, range: &str, values: Vec<Vec<Value>>) -> Result<()> {
    let url = self.url(&["values", range])?;
    let body = json!({
      "range": range,
      "majorDimension": "ROWS",
      "values": values,
    });
    self
      .send(
        "PUT values",
        self
          .client
          .put(url)
          .query(&[("valueInputOption", "RAW")])
          .json(&body),
      )
      .await?;
    Ok(())
  }
}
