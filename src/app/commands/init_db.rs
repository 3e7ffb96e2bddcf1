use log::*;

use actix_rt::System;

use crate::{
  error::*,
  app::*,
  db::DbService,
};

/// Apply the schema script and exit.
pub fn execute(config: AppConfig) -> Result<()> {
  let db_url = config.require_str("db.url")?;
  System::new().block_on(async move {
    let db = DbService::new(&db_url);
    let res = async {
      db.init_schema().await?;
      db.prepare().await
    }.await;
    db.close();
    res
  })?;
  info!("Database schema is ready.");
  Ok(())
}
