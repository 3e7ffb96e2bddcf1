#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use actix_web::{dev::ServiceResponse, http::header};
use tokio::sync::OnceCell;

use blogly::{
  app::AppConfig,
  db::DbService,
  services::{config_services, Services},
};

pub use blogly::views::error_pages;

pub const TEMPLATES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates");
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Address nothing listens on, for tests that never reach the database.
pub const NO_DB_URL: &str = "postgresql://blogly@127.0.0.1:1/blogly";

static SCHEMA: OnceCell<()> = OnceCell::const_new();
static COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn services(db_url: &str) -> Services {
  let config = AppConfig::with_overrides(&[
    ("db.url", db_url),
    ("web.templates", TEMPLATES),
    ("web.static_dir", STATIC_DIR),
  ]).expect("test config");
  config_services(&config).expect("test services")
}

/// Database named by `BLOGLY_TEST_DB_URL`, with the schema applied.
/// `None` when the variable is unset, the caller should skip.
pub async fn setup() -> Option<(String, DbService)> {
  let url = match std::env::var("BLOGLY_TEST_DB_URL") {
    Ok(url) => url,
    Err(_) => {
      eprintln!("BLOGLY_TEST_DB_URL not set, skipping database test.");
      return None;
    },
  };
  let db = DbService::new(&url);
  let schema_db = &db;
  SCHEMA.get_or_init(|| async move {
    schema_db.init_schema().await.expect("apply schema");
  }).await;
  Some((url, db))
}

/// Short value unique across test runs, e.g. `tag48213907`.
pub fn unique(prefix: &str) -> String {
  let nanos = SystemTime::now().duration_since(UNIX_EPOCH)
    .map(|d| d.subsec_nanos())
    .unwrap_or_default();
  let count = COUNTER.fetch_add(1, Ordering::SeqCst);
  format!("{}{}{}", prefix, nanos % 100_000_000, count)
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
  resp.headers().get(header::LOCATION)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default()
    .to_string()
}
