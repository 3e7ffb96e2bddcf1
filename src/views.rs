use log::*;

use actix_web::{
  dev::ServiceResponse,
  http::StatusCode,
  middleware::{ErrorHandlerResponse, ErrorHandlers},
  web, HttpResponse,
};
use tera::{Context, Tera};

use crate::error::*;

/// Compiled page templates.
#[derive(Debug, Clone)]
pub struct Views {
  tera: Tera,
}

impl Views {
  /// Load every `*.html` template below `dir`.
  pub fn new(dir: &str) -> Result<Self> {
    let tera = Tera::new(&format!("{}/**/*.html", dir.trim_end_matches('/')))?;
    debug!("Views: loaded {} templates from {}", tera.get_template_names().count(), dir);
    Ok(Views { tera })
  }

  pub fn render_string(&self, name: &str, ctx: &Context) -> Result<String> {
    Ok(self.tera.render(name, ctx)?)
  }

  pub fn render(&self, name: &str, ctx: &Context) -> Result<HttpResponse> {
    let body = self.render_string(name, ctx)?;
    Ok(HttpResponse::Ok()
      .content_type("text/html; charset=utf-8")
      .body(body))
  }

  /// Page for an error status, laid out like every other page.
  pub fn render_error(&self, status: StatusCode, message: &str) -> Result<String> {
    let mut ctx = Context::new();
    ctx.insert("status", &status.as_u16());
    ctx.insert("reason", status.canonical_reason().unwrap_or_default());
    ctx.insert("message", message);
    self.render_string("error.html", &ctx)
  }
}

/// Replace the body of 4xx/5xx responses with the `error.html` page.
pub fn error_pages<B: 'static>() -> ErrorHandlers<B> {
  ErrorHandlers::new().default_handler(render_error_page)
}

fn render_error_page<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
  let status = res.status();
  let message = match res.response().error() {
    Some(err) => match err.as_error::<Error>() {
      Some(err) => err.public_message(),
      None if status.is_client_error() => err.to_string(),
      None => status.canonical_reason().unwrap_or_default().to_string(),
    },
    None => status.canonical_reason().unwrap_or_default().to_string(),
  };

  let page = res.request().app_data::<web::Data<Views>>()
    .map(|views| views.render_error(status, &message));
  let body = match page {
    Some(Ok(body)) => body,
    Some(Err(err)) => {
      warn!("Views: error page failed to render: {}", err);
      error_page(status, &message)
    },
    None => error_page(status, &message),
  };

  let (req, _) = res.into_parts();
  let res = HttpResponse::build(status)
    .content_type("text/html; charset=utf-8")
    .body(body);
  Ok(ErrorHandlerResponse::Response(ServiceResponse::new(req, res).map_into_right_body()))
}
