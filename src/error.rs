use log::*;

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  // 404
  #[error("not found: {0}")]
  NotFound(String),

  // 400
  #[error("bad request: {0}")]
  BadRequest(String),

  // duplicate value for a unique column.
  #[error("unique violation: {0}")]
  UniqueViolation(String),

  // record references a row that doesn't exist.
  #[error("foreign key violation: {0}")]
  ForeignKeyViolation(String),

  #[error("disconnected: {0}")]
  DisconnectedError(String),

  #[error("postgres error")]
  PgError {
    #[from]
    source: tokio_postgres::error::Error,
  },

  #[error("template error")]
  TemplateError {
    #[from]
    source: tera::Error,
  },

  #[error("std io error")]
  IOError {
    #[from]
    source: std::io::Error,
  },

  #[error("config error")]
  ConfigError {
    #[from]
    source: config::ConfigError,
  },

  #[error(transparent)]
  Other(#[from] anyhow::Error),
}

impl Error {
  pub fn not_found(what: &str, id: i32) -> Self {
    Error::NotFound(format!("{} {} does not exist", what, id))
  }

  /// Text safe to show on an error page.
  pub fn public_message(&self) -> String {
    match self {
      Error::NotFound(ref message)
      | Error::ForeignKeyViolation(ref message)
      | Error::BadRequest(ref message)
      | Error::UniqueViolation(ref message)
      | Error::DisconnectedError(ref message) => message.clone(),
      _ => "Internal Server Error".to_string(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl ResponseError for Error {
  fn status_code(&self) -> StatusCode {
    match self {
      Error::NotFound(_) | Error::ForeignKeyViolation(_) => StatusCode::NOT_FOUND,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::UniqueViolation(_) => StatusCode::CONFLICT,
      Error::DisconnectedError(_) => StatusCode::BAD_GATEWAY,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() && !matches!(self, Error::DisconnectedError(_)) {
      error!("InternalServerError: {:?}", self);
    }
    HttpResponse::build(status)
      .content_type("text/html; charset=utf-8")
      .body(error_page(status, &self.public_message()))
  }
}

/// Bare page, used when the `error.html` template can't be rendered.
pub fn error_page(status: StatusCode, message: &str) -> String {
  format!(
    "<!DOCTYPE html>\n<html><head><title>{status}</title></head>\
    <body><h1>{status}</h1><p>{message}</p><p><a href=\"/users\">Back to users</a></p></body></html>",
    status = status,
    message = tera::escape_html(message),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn not_found_maps_to_404() {
    let err = Error::not_found("user", 7);
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(err.to_string(), "not found: user 7 does not exist");
  }

  #[test]
  fn missing_owner_is_reported_as_not_found() {
    let err = Error::ForeignKeyViolation("posts_user_id_fkey".into());
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn internal_errors_hide_details() {
    let err = Error::Other(anyhow::anyhow!("secret detail"));
    let resp = err.error_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err.public_message(), "Internal Server Error");
  }

  #[test]
  fn error_page_escapes_message() {
    let page = error_page(StatusCode::BAD_REQUEST, "<script>");
    assert!(page.contains("&lt;script&gt;"));
    assert!(!page.contains("<script>"));
  }
}
