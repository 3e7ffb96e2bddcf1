//! Page handlers that answer without touching the database.

mod common;

use actix_web::{http::StatusCode, test, App};

use common::*;

#[actix_web::test]
async fn root_redirects_to_users() {
  let services = services(NO_DB_URL);
  let app = test::init_service(
    App::new().wrap(error_pages()).configure(|web| services.web_config(web))
  ).await;

  let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
  assert_eq!(resp.status(), StatusCode::FOUND);
  assert_eq!(location(&resp), "/users");
}

#[actix_web::test]
async fn new_forms_render() {
  let services = services(NO_DB_URL);
  let app = test::init_service(
    App::new().wrap(error_pages()).configure(|web| services.web_config(web))
  ).await;

  let req = test::TestRequest::get().uri("/users/new").to_request();
  let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
  assert!(body.contains(r#"name="first_name""#));
  assert!(body.contains(r#"name="last_name""#));
  assert!(body.contains(r#"name="image_url""#));

  let req = test::TestRequest::get().uri("/tags/new?flash=Tag+name+is+required.").to_request();
  let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
  assert!(body.contains(r#"name="add-tag""#));
  assert!(body.contains("Tag name is required."));
}

#[actix_web::test]
async fn invalid_user_redirects_back_with_flash() {
  let services = services(NO_DB_URL);
  let app = test::init_service(
    App::new().wrap(error_pages()).configure(|web| services.web_config(web))
  ).await;

  let req = test::TestRequest::post()
    .uri("/users/new")
    .set_form(vec![("first_name", ""), ("last_name", "Doe"), ("image_url", "")])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::FOUND);
  assert_eq!(location(&resp), "/users/new?flash=First+name+is+required.");
}

#[actix_web::test]
async fn empty_post_redirects_back_to_form() {
  let services = services(NO_DB_URL);
  let app = test::init_service(
    App::new().wrap(error_pages()).configure(|web| services.web_config(web))
  ).await;

  let req = test::TestRequest::post()
    .uri("/users/3/posts/new")
    .set_form(vec![("title", ""), ("content", "Body")])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::FOUND);
  assert!(location(&resp).starts_with("/users/3/posts/new?flash="));

  let req = test::TestRequest::post()
    .uri("/posts/8/edit")
    .set_form(vec![("title", "Title"), ("content", "")])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::FOUND);
  assert_eq!(location(&resp), "/posts/8/edit?flash=Content+is+required.");
}

#[actix_web::test]
async fn bad_tag_id_is_bad_request() {
  let services = services(NO_DB_URL);
  let app = test::init_service(
    App::new().wrap(error_pages()).configure(|web| services.web_config(web))
  ).await;

  let req = test::TestRequest::post()
    .uri("/users/3/posts/new")
    .set_form(vec![("title", "Hi"), ("content", "Body"), ("tags", "x")])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn non_numeric_ids_are_not_found() {
  let services = services(NO_DB_URL);
  let app = test::init_service(
    App::new().wrap(error_pages()).configure(|web| services.web_config(web))
  ).await;

  for uri in ["/users/abc", "/posts/abc/edit", "/tags/abc/delete"] {
    let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
  }
}

#[actix_web::test]
async fn error_pages_use_the_layout() {
  let services = services(NO_DB_URL);
  let app = test::init_service(
    App::new().wrap(error_pages()).configure(|web| services.web_config(web))
  ).await;

  let req = test::TestRequest::get().uri("/users/abc").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
  assert!(body.contains("<nav>"));
  assert!(body.contains(r#"href="/tags">Tags</a>"#));
  assert!(body.contains("404 Not Found"));

  let req = test::TestRequest::post()
    .uri("/users/3/posts/new")
    .set_form(vec![("title", "Hi"), ("content", "Body"), ("tags", "x")])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
  assert!(body.contains("<nav>"));
  assert!(body.contains("400 Bad Request"));
}

#[actix_web::test]
async fn nul_byte_in_field_goes_back_to_form() {
  let services = services(NO_DB_URL);
  let app = test::init_service(
    App::new().wrap(error_pages()).configure(|web| services.web_config(web))
  ).await;

  let req = test::TestRequest::post()
    .uri("/users/new")
    .set_form(vec![("first_name", "Jo\0hn"), ("last_name", "Doe"), ("image_url", "")])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::FOUND);
  assert_eq!(location(&resp), "/users/new?flash=First+name+contains+an+invalid+character.");
}

#[actix_web::test]
async fn serves_stylesheet() {
  let services = services(NO_DB_URL);
  let app = test::init_service(
    App::new().wrap(error_pages()).configure(|web| services.web_config(web))
  ).await;

  let resp = test::call_service(&app,
    test::TestRequest::get().uri("/static/style.css").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
}
