use log::*;

use actix_web::{get, post, route, web, HttpResponse};

use crate::error::*;
use crate::flash::*;
use crate::forms::*;
use crate::db::DbService;
use crate::views::Views;

fn duplicate_name(name: &str) -> String {
  format!("Tag '{}' already exists.", name)
}

/// Get list of tags
#[get("/tags")]
async fn list(
  db: web::Data<DbService>,
  views: web::Data<Views>,
  flash: web::Query<Flash>,
) -> Result<HttpResponse> {
  let tags = db.tag.list().await?;

  let mut ctx = flash.context();
  ctx.insert("tags", &tags);
  views.render("tags/list.html", &ctx)
}

/// Add tag form
#[get("/tags/new")]
async fn new_form(
  views: web::Data<Views>,
  flash: web::Query<Flash>,
) -> Result<HttpResponse> {
  views.render("tags/new.html", &flash.context())
}

/// Store a new tag, names are unique
#[post("/tags/new")]
async fn create(
  db: web::Data<DbService>,
  form: web::Form<TagForm>,
) -> Result<HttpResponse> {
  let name = match form.validate() {
    Ok(name) => name,
    Err(Invalid(message)) => return redirect_with_flash("/tags/new", &message),
  };

  match db.tag.store(&name).await {
    Ok(tag_id) => {
      info!("Tag - stored tag: id={}, name={}", tag_id, name);
      Ok(redirect("/tags"))
    },
    Err(Error::UniqueViolation(_)) => {
      redirect_with_flash("/tags/new", &duplicate_name(&name))
    },
    Err(err) => Err(err),
  }
}

/// Tag details with the posts using it
#[get("/tags/{id:\\d+}")]
async fn show(
  db: web::Data<DbService>,
  views: web::Data<Views>,
  flash: web::Query<Flash>,
  tag_id: web::Path<i32>,
) -> Result<HttpResponse> {
  let tag_id = tag_id.into_inner();
  let (tag, posts) = futures::try_join!(
    db.tag.get_by_id(tag_id),
    db.post.list_by_tag(tag_id),
  )?;
  let tag = tag.ok_or_else(|| Error::not_found("tag", tag_id))?;

  let mut ctx = flash.context();
  ctx.insert("tag", &tag);
  ctx.insert("posts", &posts);
  views.render("tags/detail.html", &ctx)
}

/// Edit tag form
#[get("/tags/{id:\\d+}/edit")]
async fn edit_form(
  db: web::Data<DbService>,
  views: web::Data<Views>,
  flash: web::Query<Flash>,
  tag_id: web::Path<i32>,
) -> Result<HttpResponse> {
  let tag_id = tag_id.into_inner();
  let tag = db.tag.get_by_id(tag_id).await?
    .ok_or_else(|| Error::not_found("tag", tag_id))?;

  let mut ctx = flash.context();
  ctx.insert("tag", &tag);
  views.render("tags/edit.html", &ctx)
}

/// Rename a tag
#[post("/tags/{id:\\d+}/edit")]
async fn update(
  db: web::Data<DbService>,
  tag_id: web::Path<i32>,
  form: web::Form<TagForm>,
) -> Result<HttpResponse> {
  let tag_id = tag_id.into_inner();
  let edit_path = format!("/tags/{}/edit", tag_id);
  let name = match form.validate() {
    Ok(name) => name,
    Err(Invalid(message)) => return redirect_with_flash(&edit_path, &message),
  };

  match db.tag.update(tag_id, &name).await {
    Ok(()) => {
      info!("Tag - renamed tag: id={}, name={}", tag_id, name);
      Ok(redirect(&format!("/tags/{}", tag_id)))
    },
    Err(Error::UniqueViolation(_)) => redirect_with_flash(&edit_path, &duplicate_name(&name)),
    Err(err) => Err(err),
  }
}

/// Delete a tag, its posts stay
#[route("/tags/{id:\\d+}/delete", method = "GET", method = "POST")]
async fn delete(
  db: web::Data<DbService>,
  tag_id: web::Path<i32>,
) -> Result<HttpResponse> {
  let tag_id = tag_id.into_inner();
  db.tag.delete(tag_id).await?;
  info!("Tag - deleted tag: id={}", tag_id);
  Ok(redirect("/tags"))
}

#[derive(Debug, Clone, Default)]
pub struct TagService {
}

impl super::Service for TagService {
  fn web_config(&self, web: &mut web::ServiceConfig) {
    web
      .service(list)
      .service(new_form)
      .service(create)
      .service(show)
      .service(edit_form)
      .service(update)
      .service(delete);
  }
}

pub fn new_factory() -> TagService {
  Default::default()
}
