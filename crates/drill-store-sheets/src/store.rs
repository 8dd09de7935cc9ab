//! [`SheetsStore`] — the spreadsheet implementation of [`Repository`].

use chrono::NaiveDate;
use drill_core::{record::Collection, store::Repository};

use crate::{Result, client::SheetsClient, config::SheetsConfig, table};

/// A collection kept in one worksheet of a Google spreadsheet.
#[derive(Clone)]
pub struct SheetsStore {
  client:    SheetsClient,
  /// Blank `next_review` cells are scheduled relative to this date.
  reference: NaiveDate,
}

impl SheetsStore {
  /// Build a client and make sure the worksheet exists, adding it when it
  /// does not. Fails if the spreadsheet cannot be reached.
  pub async fn connect(config: SheetsConfig, reference: NaiveDate) -> Result<Self> {
    let store = Self { client: SheetsClient::new(config)?, reference };
    store.ensure_worksheet().await?;
    Ok(store)
  }

  pub fn config(&self) -> &SheetsConfig { self.client.config() }

  async fn ensure_worksheet(&self) -> Result<()> {
    let title = &self.config().worksheet;
    let titles = self.client.worksheet_titles().await?;
    if titles.iter().any(|t| t == title) {
      return Ok(());
    }
    tracing::info!(worksheet = %title, "worksheet missing, adding it");
    self.client.add_worksheet(title).await
  }
}

impl Repository for SheetsStore {
  type Error = crate::Error;

  async fn load(&self) -> Result<Collection> {
    let rows = self.client.read_values(&self.config().range()).await?;
    let collection = table::decode(&rows, self.reference)?;
    tracing::debug!(
      spreadsheet = %self.config().spreadsheet_id,
      records = collection.len(),
      "loaded worksheet"
    );
    Ok(collection)
  }

  /// Overwrite the rows from the top, then blank whatever an earlier, longer
  /// save left below them. A failed write leaves the old rows intact.
  async fn save(&self, collection: &Collection) -> Result<()> {
    let rows = table::encode(collection);
    let written = rows.len();
    self.client.write_values(&self.config().range(), rows).await?;
    self
      .client
      .clear_values(&self.config().rows_from(written + 1, table::LAST_COLUMN))
      .await?;
    tracing::debug!(
      spreadsheet = %self.config().spreadsheet_id,
      records = collection.len(),
      "saved worksheet"
    );
    Ok(())
  }
}
