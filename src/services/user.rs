use log::*;

use actix_web::{get, post, route, web, HttpResponse};

use crate::error::*;
use crate::flash::*;
use crate::forms::*;
use crate::db::DbService;
use crate::views::Views;

/// Start page, same as the users listing.
#[get("/")]
async fn index() -> HttpResponse {
  redirect("/users")
}

/// List all users
#[get("/users")]
async fn list(
  db: web::Data<DbService>,
  views: web::Data<Views>,
  flash: web::Query<Flash>,
) -> Result<HttpResponse> {
  let users = db.user.list().await?;

  let mut ctx = flash.context();
  ctx.insert("users", &users);
  views.render("users/list.html", &ctx)
}

/// Add user form
#[get("/users/new")]
async fn new_form(
  views: web::Data<Views>,
  flash: web::Query<Flash>,
) -> Result<HttpResponse> {
  let mut ctx = flash.context();
  ctx.insert("form", &UserForm::default());
  views.render("users/new.html", &ctx)
}

/// Store a new user
#[post("/users/new")]
async fn create(
  db: web::Data<DbService>,
  form: web::Form<UserForm>,
) -> Result<HttpResponse> {
  let user = match form.validate() {
    Ok(user) => user,
    Err(Invalid(message)) => return redirect_with_flash("/users/new", &message),
  };

  let user_id = db.user.store(&user).await?;
  info!("User - stored user: id={}", user_id);
  Ok(redirect("/users"))
}

/// User details with their posts
#[get("/users/{id:\\d+}")]
async fn show(
  db: web::Data<DbService>,
  views: web::Data<Views>,
  flash: web::Query<Flash>,
  user_id: web::Path<i32>,
) -> Result<HttpResponse> {
  let user_id = user_id.into_inner();
  let (user, posts) = futures::try_join!(
    db.user.get_by_id(user_id),
    db.post.list_by_user(user_id),
  )?;
  let user = user.ok_or_else(|| Error::not_found("user", user_id))?;

  let mut ctx = flash.context();
  ctx.insert("user", &user);
  ctx.insert("full_name", &user.full_name());
  ctx.insert("posts", &posts);
  views.render("users/detail.html", &ctx)
}

/// Edit user form, filled with the current values
#[get("/users/{id:\\d+}/edit")]
async fn edit_form(
  db: web::Data<DbService>,
  views: web::Data<Views>,
  flash: web::Query<Flash>,
  user_id: web::Path<i32>,
) -> Result<HttpResponse> {
  let user_id = user_id.into_inner();
  let user = db.user.get_by_id(user_id).await?
    .ok_or_else(|| Error::not_found("user", user_id))?;

  let mut ctx = flash.context();
  ctx.insert("form", &UserForm::from(&user));
  ctx.insert("user", &user);
  views.render("users/edit.html", &ctx)
}

/// Overwrite a user with the submitted values
#[post("/users/{id:\\d+}/edit")]
async fn update(
  db: web::Data<DbService>,
  user_id: web::Path<i32>,
  form: web::Form<UserForm>,
) -> Result<HttpResponse> {
  let user_id = user_id.into_inner();
  let user = match form.validate() {
    Ok(user) => user,
    Err(Invalid(message)) => {
      return redirect_with_flash(&format!("/users/{}/edit", user_id), &message);
    },
  };

  db.user.update(user_id, &user).await?;
  info!("User - updated user: id={}", user_id);
  Ok(redirect(&format!("/users/{}", user_id)))
}

/// Delete a user and all of their posts
#[route("/users/{id:\\d+}/delete", method = "GET", method = "POST")]
async fn delete(
  db: web::Data<DbService>,
  user_id: web::Path<i32>,
) -> Result<HttpResponse> {
  let user_id = user_id.into_inner();
  db.user.delete(user_id).await?;
  info!("User - deleted user: id={}", user_id);
  Ok(redirect("/users"))
}

#[derive(Debug, Clone, Default)]
pub struct UserService {
}

impl super::Service for UserService {
  fn web_config(&self, web: &mut web::ServiceConfig) {
    web
      .service(index)
      .service(list)
      .service(new_form)
      .service(create)
      .service(show)
      .service(edit_form)
      .service(update)
      .service(delete);
  }
}

pub fn new_factory() -> UserService {
  Default::default()
}
