pub mod util;

mod client;
pub use client::*;

mod user;
mod post;
mod tag;
pub use self::{
  user::*,
  post::*,
  tag::*,
};

use log::*;

use crate::error::*;

/// Schema script, safe to run against an already initialized database.
pub const SCHEMA: &str = include_str!("../../migrations/schema.sql");

/// The record store.  One per worker, all services share one client.
#[derive(Clone)]
pub struct DbService {
  pub shared_cl: SharedClient,
  pub user: UserService,
  pub post: PostService,
  pub tag: TagService,
}

impl DbService {
  pub fn new(db_url: &str) -> DbService {
    let shared_cl = SharedClient::new(db_url);

    DbService {
      user: UserService::new(shared_cl.clone()),
      post: PostService::new(shared_cl.clone()),
      tag: TagService::new(shared_cl.clone()),
      shared_cl,
    }
  }

  /// Drop the connection, see `SharedClient::close`.
  pub fn close(&self) {
    self.shared_cl.close();
  }

  /// Create any missing tables and indexes.
  pub async fn init_schema(&self) -> Result<()> {
    info!("DBService: apply schema.");
    self.shared_cl.batch_execute(SCHEMA).await
  }

  /// Prepare every statement up front, surfacing SQL errors at startup.
  pub async fn prepare(&self) -> Result<()> {
    info!("DBService: Prepare UserService.");
    self.user.prepare().await?;
    info!("DBService: Prepare PostService.");
    self.post.prepare().await?;
    info!("DBService: Prepare TagService.");
    self.tag.prepare().await?;

    info!("DBService: finished.");
    Ok(())
  }
}
