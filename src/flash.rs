//! One-shot messages carried across a redirect in the `flash` query parameter.

use actix_web::{http::header, HttpResponse};
use serde::Deserialize;
use tera::Context;

use crate::error::*;

/// Query string of a page that may display a flash message.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
pub struct Flash {
  pub flash: Option<String>,
}

impl Flash {
  /// Start a template context, with the flash message when there is one.
  pub fn context(&self) -> Context {
    let mut ctx = Context::new();
    if let Some(message) = self.flash.as_deref().filter(|m| !m.is_empty()) {
      ctx.insert("flash", message);
    }
    ctx
  }
}

/// 302 Found to `location`.
pub fn redirect(location: &str) -> HttpResponse {
  HttpResponse::Found()
    .insert_header((header::LOCATION, location))
    .finish()
}

/// 302 Found to `location` with `message` attached as the flash parameter.
pub fn redirect_with_flash(location: &str, message: &str) -> Result<HttpResponse> {
  let query = serde_urlencoded::to_string(&[("flash", message)][..])
    .map_err(anyhow::Error::from)?;
  Ok(redirect(&format!("{}?{}", location, query)))
}
