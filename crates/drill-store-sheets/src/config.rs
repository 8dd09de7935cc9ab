//! Connection settings for the spreadsheet backend.

use serde::Deserialize;

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_WORKSHEET: &str = "problems";

/// Where the collection lives and how to reach it.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
  /// The spreadsheet key from its URL.
  pub spreadsheet_id: String,
  #[serde(default = "default_worksheet")]
  pub worksheet:      String,
  /// OAuth 2 bearer token with the spreadsheets scope. Sent only when
  /// non-empty.
  #[serde(default)]
  pub access_token:   String,
  #[serde(default = "default_api_base")]
  pub api_base:       String,
}

fn default_worksheet() -> String { DEFAULT_WORKSHEET.to_owned() }

fn default_api_base() -> String { DEFAULT_API_BASE.to_owned() }

impl SheetsConfig {
  pub fn new(spreadsheet_id: impl Into<String>) -> Self {
    Self {
      spreadsheet_id: spreadsheet_id.into(),
      worksheet:      default_worksheet(),
      access_token:   String::new(),
      api_base:       default_api_base(),
    }
  }

  /// The worksheet as an A1 range covering the whole sheet.
  pub fn range(&self) -> String {
    format!("'{}'", self.worksheet.replace('\'', "''"))
  }

  /// Columns `A` through `last_column`, from `first_row` (1-based) to the
  /// bottom of the sheet.
  pub fn rows_from(&self, first_row: usize, last_column: char) -> String {
    format!("{}!A{first_row}:{last_column}", self.range())
  }
}
