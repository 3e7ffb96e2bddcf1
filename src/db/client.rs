use log::*;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

use tokio_postgres::{
  connect, Client, Statement, Row, NoTls,
  error::SqlState,
  types::ToSql,
};

use crate::error::*;

const MAX_RETRIES: u32 = 50;
const RETRY_DELAY: Duration = Duration::from_millis(100);
const RECONNECT_DELAY: Duration = Duration::from_millis(500);

/// A connected client tagged with the generation of its connection.
pub type RefClient = Rc<(u64, Client)>;

/// Client connected state
#[derive(Clone)]
pub enum ClientState {
  Connecting(u64),
  Connected(RefClient),
  Closed,
}

/// A postgres client shared by all store services of one worker.
///
/// A background task owns the connection.  Each time it reconnects the
/// generation number goes up, which tells prepared queries to prepare again.
#[derive(Clone)]
pub struct SharedClient {
  state: Rc<RefCell<ClientState>>,
  task: Rc<JoinHandle<()>>,
}

async fn run_connection(state: Rc<RefCell<ClientState>>, url: String) {
  let mut generation = 0;
  loop {
    generation += 1;
    debug!("client task: gen={}: connecting", generation);
    state.replace(ClientState::Connecting(generation));
    let (cl, conn) = loop {
      match connect(&url, NoTls).await {
        Ok(pair) => break pair,
        Err(e) => {
          debug!("client task: gen={}: connect error: {}", generation, e);
          sleep(RECONNECT_DELAY).await;
        },
      }
    };
    debug!("client task: gen={}: connected", generation);
    state.replace(ClientState::Connected(Rc::new((generation, cl))));

    // Drive the connection until it closes.
    match conn.await {
      Err(e) => {
        warn!("postgres connection error: {}", e);
      },
      Ok(()) => {
        debug!("postgres connection closed.");
        state.replace(ClientState::Closed);
        return;
      },
    }
    sleep(RECONNECT_DELAY).await;
  }
}

impl SharedClient {
  pub fn new(url: &str) -> Self {
    let state = Rc::new(RefCell::new(ClientState::Connecting(0)));
    let task = actix_rt::spawn(run_connection(state.clone(), url.to_string()));
    Self {
      state,
      task: Rc::new(task),
    }
  }

  /// Stop the background task and drop the connection.  Queries fail with
  /// `Error::DisconnectedError` afterwards.
  pub fn close(&self) {
    self.task.abort();
    self.set_state(ClientState::Closed);
    debug!("client closed.");
  }

  pub fn is_closed(&self) -> bool {
    matches!(*self.state.borrow(), ClientState::Closed)
  }

  pub async fn get_client(&self) -> Result<RefClient> {
    for _ in 0..MAX_RETRIES {
      match self.get_state() {
        ClientState::Connected(cl) => return Ok(cl),
        ClientState::Connecting(generation) => {
          debug!("get_client: gen={}: waiting for connection", generation);
          sleep(RETRY_DELAY).await;
        },
        ClientState::Closed => break,
      }
    }
    Err(Error::DisconnectedError("Failed to connect to database".to_string()))
  }

  /// Run one or more statements without parameters, e.g. the schema script.
  pub async fn batch_execute(&self, sql: &str) -> Result<()> {
    let cl = self.get_client().await?;
    cl.1.batch_execute(sql).await?;
    Ok(())
  }

  fn get_state(&self) -> ClientState {
    self.state.borrow().clone()
  }

  fn set_state(&self, state: ClientState) {
    self.state.replace(state);
  }
}

/// A statement prepared lazily against the current connection generation.
#[derive(Clone)]
pub struct PreparedQuery {
  shared_cl: SharedClient,
  prepared: RefCell<Option<(RefClient, Statement)>>,
  sql: String,
}

macro_rules! impl_client_method {
  ($method:ident, $res_ty:ty) => {
    pub async fn $method(&self, params: &[&(dyn ToSql + Sync)]) -> Result<$res_ty> {
      let mut retries = 0;
      loop {
        let (cl, statement) = self.get_statement().await?;
        match cl.1.$method(&statement, params).await {
          Ok(res) => return Ok(res),
          Err(err) if err.is_closed() && retries < MAX_RETRIES => {
            retries += 1;
            info!("DB connection closed, retry query.");
            sleep(RETRY_DELAY).await;
          },
          Err(err) => return Err(self.map_error(err)),
        }
      }
    }
  };
}

impl PreparedQuery {
  pub fn new(shared_cl: SharedClient, sql: &str) -> Self {
    Self {
      shared_cl,
      prepared: RefCell::new(None),
      sql: sql.to_string(),
    }
  }

  pub async fn prepare(&self) -> Result<()> {
    self.get_statement().await?;
    Ok(())
  }

  async fn get_statement(&self) -> Result<(RefClient, Statement)> {
    let cl = self.shared_cl.get_client().await?;
    if let Some((ref prepared_cl, ref statement)) = *self.prepared.borrow() {
      if prepared_cl.0 == cl.0 {
        return Ok((prepared_cl.clone(), statement.clone()));
      }
    }
    debug!("prepare: gen={}: [[{}]]", cl.0, self.sql);
    let statement = cl.1.prepare(&self.sql).await
      .map_err(|err| self.map_error(err))?;
    self.prepared.replace(Some((cl.clone(), statement.clone())));
    Ok((cl, statement))
  }

  /// Sort constraint failures from other server errors.
  fn map_error(&self, err: tokio_postgres::Error) -> Error {
    let constraint = err.as_db_error()
      .and_then(|db_err| db_err.constraint())
      .unwrap_or_default()
      .to_string();
    match err.code() {
      Some(code) if *code == SqlState::UNIQUE_VIOLATION => {
        debug!("unique violation: {}", constraint);
        Error::UniqueViolation(constraint)
      },
      Some(code) if *code == SqlState::FOREIGN_KEY_VIOLATION => {
        debug!("foreign key violation: {}", constraint);
        Error::ForeignKeyViolation(constraint)
      },
      _ => {
        error!("Postgres error: {}, query=[[{}]]", err, self.sql);
        err.into()
      },
    }
  }

  impl_client_method!(query, Vec<Row>);
  impl_client_method!(query_one, Row);
  impl_client_method!(query_opt, Option<Row>);
  impl_client_method!(execute, u64);
}
