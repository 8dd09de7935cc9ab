//! Tests for the worksheet codec, request building, and the store's request
//! flow against an in-process fake of the values API.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex},
};

use axum::{
  Json, Router,
  extract::State,
  http::{HeaderMap, Method, StatusCode, Uri, header},
  response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use drill_core::{
  record::{Collection, ScheduleRecord},
  store::Repository,
};
use serde_json::{Value, json};

use crate::{Error, HEADERS, SheetsConfig, SheetsStore, client::SheetsClient, table};

fn reference() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 9, 1).unwrap() }

fn rows(value: Value) -> Vec<Vec<Value>> { serde_json::from_value(value).unwrap() }

// ─── Codec ───────────────────────────────────────────────────────────────────

#[test]
fn empty_sheet_is_empty_collection() {
  assert!(table::decode(&[], reference()).unwrap().is_empty());
  assert!(
    table::decode(&rows(json!([HEADERS])), reference())
      .unwrap()
      .is_empty()
  );
}

#[test]
fn encode_writes_header_then_records() {
  let collection: Collection = [ScheduleRecord {
    difficulty:    4,
    ease_factor:   2.45,
    repetitions:   1,
    interval_days: 10,
    last_review:   NaiveDate::from_ymd_opt(2024, 8, 20),
    next_review:   NaiveDate::from_ymd_opt(2024, 8, 30),
    notes:         "heap".into(),
    ..ScheduleRecord::new("kth-largest")
  }]
  .into_iter()
  .collect();

  let encoded = table::encode(&collection);
  assert_eq!(encoded.len(), 2);
  assert_eq!(encoded[0], HEADERS.map(Value::from).to_vec());
  assert_eq!(
    encoded[1],
    rows(json!([["kth-largest", 4, 2.45, 1, 10, "2024-08-20", "2024-08-30", "heap"]]))[0]
  );
}

#[test]
fn encode_then_decode_keeps_records() {
  let collection: Collection = [
    ScheduleRecord {
      next_review: NaiveDate::from_ymd_opt(2024, 9, 4),
      ..ScheduleRecord::new("a")
    },
    ScheduleRecord {
      ease_factor: 1.3,
      last_review: NaiveDate::from_ymd_opt(2024, 8, 1),
      next_review: NaiveDate::from_ymd_opt(2024, 8, 4),
      ..ScheduleRecord::new("b")
    },
  ]
  .into_iter()
  .collect();

  let decoded = table::decode(&table::encode(&collection), reference()).unwrap();
  assert_eq!(decoded, collection);
}

#[test]
fn formatted_text_cells_with_blanks_take_defaults() {
  let sheet = rows(json!([
    ["notes", "id", "difficulty", "ef", "reps", "interval", "last_review", "next_review"],
    ["typed by hand", "  merge-intervals ", "", "", "", "", "", ""],
    ["", "", "5", "2.1", "1", "10", "", ""],
    [],
    ["", "climb", "2.0", "2.6", "3", "30", "None", "2024-09-10"],
  ]));

  let collection = table::decode(&sheet, reference()).unwrap();
  assert_eq!(collection.len(), 2);

  let merge = collection.get("merge-intervals").unwrap();
  assert_eq!(merge.difficulty, 3);
  assert_eq!(merge.ease_factor, 2.5);
  assert_eq!(merge.repetitions, 0);
  assert_eq!(merge.interval_days, 3);
  assert_eq!(merge.last_review, None);
  assert_eq!(merge.next_review, NaiveDate::from_ymd_opt(2024, 9, 4));
  assert_eq!(merge.notes, "typed by hand");

  let climb = collection.get("climb").unwrap();
  assert_eq!(climb.difficulty, 2);
  assert_eq!(climb.repetitions, 3);
  assert_eq!(climb.last_review, None);
  assert_eq!(climb.next_review, NaiveDate::from_ymd_opt(2024, 9, 10));
}

#[test]
fn short_rows_read_missing_cells_as_blank() {
  let sheet = rows(json!([HEADERS, ["short", 4]]));
  let record = table::decode(&sheet, reference()).unwrap();
  let record = record.get("short").unwrap();

  assert_eq!(record.difficulty, 4);
  assert_eq!(record.notes, "");
}

#[test]
fn missing_id_header_is_an_error() {
  let sheet = rows(json!([["name", "difficulty"], ["x", 3]]));
  assert!(matches!(
    table::decode(&sheet, reference()),
    Err(Error::MissingHeader("id"))
  ));
}

#[test]
fn bad_cells_report_their_row() {
  let sheet = rows(json!([HEADERS, ["ok", 3], ["bad", "hard"]]));
  match table::decode(&sheet, reference()) {
    Err(Error::InvalidCell { row, column, value }) => {
      assert_eq!((row, column, value.as_str()), (3, "difficulty", "hard"));
    }
    other => panic!("expected InvalidCell, got {other:?}"),
  }

  let sheet = rows(json!([HEADERS, ["neg", 3, 2.5, -1]]));
  assert!(matches!(
    table::decode(&sheet, reference()),
    Err(Error::InvalidCell { column: "reps", .. })
  ));
}

// ─── Requests ────────────────────────────────────────────────────────────────

#[test]
fn config_defaults() {
  let cfg: SheetsConfig = serde_json::from_value(json!({ "spreadsheet_id": "abc" })).unwrap();
  assert_eq!(cfg.worksheet, "problems");
  assert_eq!(cfg.api_base, "https://sheets.googleapis.com/v4");
  assert!(cfg.access_token.is_empty());
}

#[test]
fn range_quotes_worksheet_title() {
  let mut cfg = SheetsConfig::new("abc");
  assert_eq!(cfg.range(), "'problems'");
  cfg.worksheet = "Bob's list".into();
  assert_eq!(cfg.range(), "'Bob''s list'");
}

#[test]
fn urls_escape_segments() {
  let mut cfg = SheetsConfig::new("sheet-key");
  cfg.api_base = "http://localhost:8080/v4/".into();
  let client = SheetsClient::new(cfg).unwrap();

  assert_eq!(
    client.url(&[]).unwrap().as_str(),
    "http://localhost:8080/v4/spreadsheets/sheet-key"
  );
  assert_eq!(
    client.url(&["values", "'my sheet'"]).unwrap().as_str(),
    "http://localhost:8080/v4/spreadsheets/sheet-key/values/'my%20sheet'"
  );
}

#[test]
fn bad_base_url_is_reported() {
  let mut cfg = SheetsConfig::new("k");
  cfg.api_base = "not a url".into();
  let client = SheetsClient::new(cfg).unwrap();
  assert!(matches!(client.url(&[]), Err(Error::BaseUrl(_))));
}

#[test]
fn rows_from_targets_record_columns() {
  let cfg = SheetsConfig::new("abc");
  assert_eq!(table::LAST_COLUMN, 'H');
  assert_eq!(cfg.rows_from(4, table::LAST_COLUMN), "'problems'!A4:H");
}

// ─── Fake spreadsheet ────────────────────────────────────────────────────────

const TOKEN: &str = "token-123";

/// One request as the fake saw it.
#[derive(Debug, Clone)]
struct Seen {
  method: Method,
  /// Path after `/v4/spreadsheets/sheet-key`, with the query appended.
  target: String,
  auth:   Option<String>,
  body:   Value,
}

#[derive(Default)]
struct Sheet {
  titles:   Vec<String>,
  values:   Vec<Vec<Value>>,
  seen:     Vec<Seen>,
  /// Operation name → status returned instead of handling it.
  rejected: HashMap<&'static str, StatusCode>,
}

#[derive(Clone, Default)]
struct Fake(Arc<Mutex<Sheet>>);

impl Fake {
  fn with_titles(titles: &[&str]) -> Self {
    let fake = Self::default();
    fake.sheet().titles = titles.iter().map(|t| (*t).to_owned()).collect();
    fake
  }

  fn sheet(&self) -> std::sync::MutexGuard<'_, Sheet> { self.0.lock().unwrap() }

  fn reject(&self, operation: &'static str, status: StatusCode) {
    self.sheet().rejected.insert(operation, status);
  }

  fn seen(&self) -> Vec<Seen> { self.sheet().seen.clone() }

  fn targets(&self) -> Vec<String> {
    self
      .seen()
      .into_iter()
      .map(|s| format!("{} {}", s.method, s.target))
      .collect()
  }

  /// Serve the fake on an ephemeral port and return a config pointing at it.
  async fn serve(&self) -> SheetsConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().fallback(handle).with_state(self.clone());
    tokio::spawn(async move { axum::serve(listener, app).await.ok() });

    let mut cfg = SheetsConfig::new("sheet-key");
    cfg.api_base = format!("http://{addr}/v4");
    cfg.access_token = TOKEN.into();
    cfg
  }
}

/// Rows below the start row of an `A<n>:<col>` range are dropped.
fn clear_range(values: &mut Vec<Vec<Value>>, range: &str) {
  let first_row = range
    .split_once('!')
    .and_then(|(_, cells)| cells.strip_prefix('A'))
    .and_then(|cells| cells.split(':').next())
    .and_then(|row| row.parse::<usize>().ok())
    .unwrap_or(1);
  values.truncate(first_row.saturating_sub(1));
}

async fn handle(
  State(fake): State<Fake>,
  method: Method,
  uri: Uri,
  headers: HeaderMap,
  body: String,
) -> Response {
  let path = uri.path().strip_prefix("/v4/spreadsheets/sheet-key").unwrap_or("?");
  let target = match uri.query() {
    Some(q) => format!("{path}?{q}"),
    None => path.to_owned(),
  };
  let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);

  let mut sheet = fake.sheet();
  sheet.seen.push(Seen {
    method: method.clone(),
    target,
    auth: headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .map(str::to_owned),
    body: body.clone(),
  });

  let range = path.strip_prefix("/values/").unwrap_or_default();
  let operation = if method == Method::GET && path.is_empty() {
    "titles"
  } else if method == Method::POST && path == ":batchUpdate" {
    "add"
  } else if method == Method::GET && !range.is_empty() {
    "read"
  } else if method == Method::POST && range.ends_with(":clear") {
    "clear"
  } else if method == Method::PUT && !range.is_empty() {
    "write"
  } else {
    return StatusCode::NOT_FOUND.into_response();
  };
  if let Some(status) = sheet.rejected.get(operation) {
    return (*status, format!("{operation} refused")).into_response();
  }

  match operation {
    "titles" => {
      let sheets: Vec<Value> = sheet
        .titles
        .iter()
        .map(|t| json!({ "properties": { "title": t } }))
        .collect();
      Json(json!({ "sheets": sheets })).into_response()
    }
    "add" => {
      let title = body["requests"][0]["addSheet"]["properties"]["title"]
        .as_str()
        .unwrap_or_default()
        .to_owned();
      sheet.titles.push(title);
      Json(json!({})).into_response()
    }
    "read" if sheet.values.is_empty() => Json(json!({ "range": range })).into_response(),
    "read" => Json(json!({ "range": range, "values": sheet.values })).into_response(),
    "clear" => {
      clear_range(&mut sheet.values, range.trim_end_matches(":clear"));
      Json(json!({})).into_response()
    }
    _ => {
      let rows: Vec<Vec<Value>> =
        serde_json::from_value(body["values"].clone()).unwrap_or_default();
      for (i, row) in rows.into_iter().enumerate() {
        match sheet.values.get_mut(i) {
          Some(existing) => *existing = row,
          None => sheet.values.push(row),
        }
      }
      Json(json!({})).into_response()
    }
  }
}

fn sample() -> Collection {
  [
    ScheduleRecord {
      difficulty:    4,
      ease_factor:   2.45,
      repetitions:   2,
      interval_days: 26,
      last_review:   NaiveDate::from_ymd_opt(2024, 8, 20),
      next_review:   NaiveDate::from_ymd_opt(2024, 9, 15),
      notes:         "heap".into(),
      ..ScheduleRecord::new("kth-largest")
    },
    ScheduleRecord {
      next_review: NaiveDate::from_ymd_opt(2024, 9, 4),
      ..ScheduleRecord::new("two-sum")
    },
  ]
  .into_iter()
  .collect()
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn connect_adds_missing_worksheet() {
  let fake = Fake::with_titles(&["Sheet1"]);
  SheetsStore::connect(fake.serve().await, reference()).await.unwrap();

  assert_eq!(fake.targets(), [
    "GET ?fields=sheets.properties.title",
    "POST :batchUpdate",
  ]);
  let seen = fake.seen();
  assert!(seen.iter().all(|s| s.auth.as_deref() == Some("Bearer token-123")));

  let add = &seen[1].body["requests"][0]["addSheet"]["properties"];
  assert_eq!(add["title"], "problems");
  assert_eq!(add["gridProperties"]["rowCount"], 1000);
  assert_eq!(add["gridProperties"]["columnCount"], 20);
  assert_eq!(fake.sheet().titles, ["Sheet1", "problems"]);
}

#[tokio::test]
async fn connect_keeps_existing_worksheet() {
  let fake = Fake::with_titles(&["Sheet1", "problems"]);
  SheetsStore::connect(fake.serve().await, reference()).await.unwrap();
  assert_eq!(fake.targets(), ["GET ?fields=sheets.properties.title"]);
}

#[tokio::test]
async fn empty_worksheet_loads_empty() {
  let fake = Fake::with_titles(&["problems"]);
  let store = SheetsStore::connect(fake.serve().await, reference()).await.unwrap();

  assert!(store.load().await.unwrap().is_empty());
  assert_eq!(fake.targets()[1], "GET /values/'problems'");
}

#[tokio::test]
async fn save_writes_rows_then_clears_the_tail() {
  let fake = Fake::with_titles(&["problems"]);
  let store = SheetsStore::connect(fake.serve().await, reference()).await.unwrap();

  store.save(&sample()).await.unwrap();

  let seen = fake.seen();
  assert_eq!(fake.targets()[1..], [
    "PUT /values/'problems'?valueInputOption=RAW",
    "POST /values/'problems'!A4:H:clear",
  ]);
  let put = &seen[1].body;
  assert_eq!(put["majorDimension"], "ROWS");
  assert_eq!(put["values"][0], json!(HEADERS));
  assert_eq!(put["values"][1][0], "kth-largest");
  assert_eq!(put["values"][2][0], "two-sum");
  assert_eq!(put["values"][2][5], "");

  assert_eq!(store.load().await.unwrap(), sample());
}

#[tokio::test]
async fn shorter_save_drops_stale_rows() {
  let fake = Fake::with_titles(&["problems"]);
  let store = SheetsStore::connect(fake.serve().await, reference()).await.unwrap();
  store.save(&sample()).await.unwrap();

  let one: Collection = sample().into_iter().filter(|r| r.id == "two-sum").collect();
  store.save(&one).await.unwrap();

  assert_eq!(fake.sheet().values.len(), 2);
  assert_eq!(store.load().await.unwrap(), one);
}

#[tokio::test]
async fn failed_write_keeps_previous_rows() {
  let fake = Fake::with_titles(&["problems"]);
  let store = SheetsStore::connect(fake.serve().await, reference()).await.unwrap();
  store.save(&sample()).await.unwrap();

  fake.reject("write", StatusCode::INTERNAL_SERVER_ERROR);
  let err = store.save(&Collection::new()).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Status { operation: "PUT values", status, .. }
      if status == StatusCode::INTERNAL_SERVER_ERROR
  ));

  assert_eq!(store.load().await.unwrap(), sample());
}

#[tokio::test]
async fn rejected_requests_report_status_and_body() {
  let fake = Fake::with_titles(&["problems"]);
  let store = SheetsStore::connect(fake.serve().await, reference()).await.unwrap();

  fake.reject("read", StatusCode::FORBIDDEN);
  match store.load().await {
    Err(Error::Status { operation, status, body }) => {
      assert_eq!(operation, "GET values");
      assert_eq!(status, StatusCode::FORBIDDEN);
      assert_eq!(body, "read refused");
    }
    other => panic!("expected Status, got {other:?}"),
  }

  let fake = Fake::default();
  fake.reject("titles", StatusCode::NOT_FOUND);
  assert!(matches!(
    SheetsStore::connect(fake.serve().await, reference()).await,
    Err(Error::Status { operation: "GET spreadsheet", .. })
  ));
}
