use log::*;

use actix_web::{get, post, route, web, HttpResponse};

use crate::error::*;
use crate::flash::*;
use crate::forms::*;
use crate::db::DbService;
use crate::views::Views;

type FormPairs = web::Form<Vec<(String, String)>>;

/// Owner of a post vanished between the form and the insert.
fn missing_owner(err: Error, user_id: i32) -> Error {
  match err {
    Error::ForeignKeyViolation(_) => Error::not_found("user", user_id),
    err => err,
  }
}

/// Add post form for a user, with a checkbox per tag
#[get("/users/{id:\\d+}/posts/new")]
async fn new_form(
  db: web::Data<DbService>,
  views: web::Data<Views>,
  flash: web::Query<Flash>,
  user_id: web::Path<i32>,
) -> Result<HttpResponse> {
  let user_id = user_id.into_inner();
  let (user, tags) = futures::try_join!(
    db.user.get_by_id(user_id),
    db.tag.list(),
  )?;
  let user = user.ok_or_else(|| Error::not_found("user", user_id))?;

  let mut ctx = flash.context();
  ctx.insert("user", &user);
  ctx.insert("full_name", &user.full_name());
  ctx.insert("tags", &tags);
  ctx.insert("form", &PostForm::default());
  views.render("posts/new.html", &ctx)
}

/// Store a new post for a user
#[post("/users/{id:\\d+}/posts/new")]
async fn create(
  db: web::Data<DbService>,
  user_id: web::Path<i32>,
  form: FormPairs,
) -> Result<HttpResponse> {
  let user_id = user_id.into_inner();
  let post = match PostForm::from_pairs(form.into_inner())?.validate() {
    Ok(post) => post,
    Err(Invalid(message)) => {
      return redirect_with_flash(&format!("/users/{}/posts/new", user_id), &message);
    },
  };

  let post_id = db.post.store(user_id, &post).await
    .map_err(|err| missing_owner(err, user_id))?;
  info!("Post - stored post: id={}, user={}, tags={:?}", post_id, user_id, post.tag_ids);
  Ok(redirect(&format!("/users/{}", user_id)))
}

/// List all posts
#[get("/posts")]
async fn list(
  db: web::Data<DbService>,
  views: web::Data<Views>,
  flash: web::Query<Flash>,
) -> Result<HttpResponse> {
  let posts = db.post.list().await?;

  let mut ctx = flash.context();
  ctx.insert("posts", &posts);
  views.render("posts/list.html", &ctx)
}

/// Post details with its tags
#[get("/posts/{id:\\d+}")]
async fn show(
  db: web::Data<DbService>,
  views: web::Data<Views>,
  flash: web::Query<Flash>,
  post_id: web::Path<i32>,
) -> Result<HttpResponse> {
  let post_id = post_id.into_inner();
  let (post, tags) = futures::try_join!(
    db.post.get_by_id(post_id),
    db.tag.list_by_post(post_id),
  )?;
  let post = post.ok_or_else(|| Error::not_found("post", post_id))?;

  let mut ctx = flash.context();
  ctx.insert("post", &post);
  ctx.insert("tags", &tags);
  views.render("posts/detail.html", &ctx)
}

/// Edit post form, with the post's current tags checked
#[get("/posts/{id:\\d+}/edit")]
async fn edit_form(
  db: web::Data<DbService>,
  views: web::Data<Views>,
  flash: web::Query<Flash>,
  post_id: web::Path<i32>,
) -> Result<HttpResponse> {
  let post_id = post_id.into_inner();
  let (post, post_tags, tags) = futures::try_join!(
    db.post.get_by_id(post_id),
    db.tag.list_by_post(post_id),
    db.tag.list(),
  )?;
  let post = post.ok_or_else(|| Error::not_found("post", post_id))?;
  let form = PostForm::from_post(&post.post, post_tags.iter().map(|t| t.id).collect());

  let mut ctx = flash.context();
  ctx.insert("post", &post);
  ctx.insert("tags", &tags);
  ctx.insert("form", &form);
  views.render("posts/edit.html", &ctx)
}

/// Overwrite a post and replace its tag set
#[post("/posts/{id:\\d+}/edit")]
async fn update(
  db: web::Data<DbService>,
  post_id: web::Path<i32>,
  form: FormPairs,
) -> Result<HttpResponse> {
  let post_id = post_id.into_inner();
  let post = match PostForm::from_pairs(form.into_inner())?.validate() {
    Ok(post) => post,
    Err(Invalid(message)) => {
      return redirect_with_flash(&format!("/posts/{}/edit", post_id), &message);
    },
  };

  db.post.update(post_id, &post).await?;
  info!("Post - updated post: id={}, tags={:?}", post_id, post.tag_ids);
  Ok(redirect(&format!("/posts/{}", post_id)))
}

/// Delete a post, back to its owner's page
#[route("/posts/{id:\\d+}/delete", method = "GET", method = "POST")]
async fn delete(
  db: web::Data<DbService>,
  post_id: web::Path<i32>,
) -> Result<HttpResponse> {
  let post_id = post_id.into_inner();
  let user_id = db.post.delete(post_id).await?;
  info!("Post - deleted post: id={}, user={}", post_id, user_id);
  Ok(redirect(&format!("/users/{}", user_id)))
}

#[derive(Debug, Clone, Default)]
pub struct PostService {
}

impl super::Service for PostService {
  fn web_config(&self, web: &mut web::ServiceConfig) {
    web
      .service(new_form)
      .service(create)
      .service(list)
      .service(show)
      .service(edit_form)
      .service(update)
      .service(delete);
  }
}

pub fn new_factory() -> PostService {
  Default::default()
}
