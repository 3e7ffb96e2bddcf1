use log::*;

use std::convert::TryInto;

use actix_rt::System;
use actix_web::{middleware, App, HttpServer};

use crate::{
  error::*,
  app::*,
  db::DbService,
  services::config_services,
  views::error_pages,
};

/// Check the database before accepting requests: apply the schema if asked to
/// and, in debug mode, prepare every statement.
async fn check_db(url: String, init_schema: bool, debug: bool) -> Result<()> {
  let db = DbService::new(&url);
  let res = async {
    if init_schema {
      db.init_schema().await?;
    }
    if debug {
      db.prepare().await?;
    }
    Ok::<(), Error>(())
  }.await;
  // workers open their own connections.
  db.close();
  res
}

pub fn execute(config: AppConfig) -> Result<()> {
  let debug = config.get_bool("debug")?.unwrap_or(false);
  debug!("Debug = {:?}", debug);

  let db_url = config.require_str("db.url")?;
  let init_schema = config.get_bool("db.init_schema")?.unwrap_or(false);
  System::new().block_on(check_db(db_url, init_schema, debug))?;

  // configure services
  info!("Serve.Services: configure services.");
  let services = config_services(&config)?;

  // Start http server
  let mut server = HttpServer::new(move || {
    let services = services.clone();
    App::new()
      .wrap(error_pages())
      // enable logger
      .wrap(middleware::Condition::new(debug, middleware::Logger::default()))
      .wrap(middleware::Compress::default())
      .configure(move |web| services.web_config(web))
  });

  // workers
  if let Some(workers) = config.get_int("web.workers")? {
    info!("Workers: {}", workers);
    let workers: usize = workers.try_into()
      .map_err(|_| anyhow::anyhow!("web.workers must be > 0"))?;
    server = server.workers(workers);
  }

  // listen backlog
  if let Some(backlog) = config.get_int("web.backlog")? {
    info!("Listen backlog: {}", backlog);
    let backlog: u32 = backlog.try_into()
      .map_err(|_| anyhow::anyhow!("web.backlog must be >= 0"))?;
    server = server.backlog(backlog);
  }

  // setup binds.
  let listen = config.require_str("web.listen")?;
  info!("services listening on: {}", listen);
  server = server.bind(listen)?;

  // run server future
  let sys = System::new();
  sys.block_on(async move { server.run().await })?;
  info!("Server stopped.");
  Ok(())
}
