mod common;

use actix_web::{http::StatusCode, test, App};

use blogly::forms::{PostData, UserData};
use blogly::Error;

use common::*;

#[actix_web::test]
async fn duplicate_tag_is_not_inserted() {
  let Some((url, db)) = setup().await else { return; };
  let services = services(&url);
  let app = test::init_service(
    App::new().wrap(error_pages()).configure(|web| services.web_config(web))
  ).await;

  let name = unique("dup");
  for _ in 0..2 {
    let req = test::TestRequest::post()
      .uri("/tags/new")
      .set_form(vec![("add-tag", name.as_str())])
      .to_request();
    test::call_service(&app, req).await;
  }

  let count = db.tag.list().await.unwrap().iter().filter(|t| t.name == name).count();
  assert_eq!(count, 1);

  // the second attempt goes back to the form with a message.
  let req = test::TestRequest::post()
    .uri("/tags/new")
    .set_form(vec![("add-tag", name.as_str())])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::FOUND);
  assert!(location(&resp).starts_with("/tags/new?flash="));

  let err = db.tag.store(&name).await.unwrap_err();
  assert!(matches!(err, Error::UniqueViolation(_)));
}

#[actix_web::test]
async fn create_tag_then_list() {
  let Some((url, _db)) = setup().await else { return; };
  let services = services(&url);
  let app = test::init_service(
    App::new().wrap(error_pages()).configure(|web| services.web_config(web))
  ).await;

  let name = unique("new");
  let req = test::TestRequest::post()
    .uri("/tags/new")
    .set_form(vec![("add-tag", name.as_str())])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::FOUND);
  assert_eq!(location(&resp), "/tags");

  let req = test::TestRequest::get().uri("/tags").to_request();
  let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
  assert!(body.contains(&name));
}

#[actix_web::test]
async fn rename_to_taken_name_goes_back_to_form() {
  let Some((url, db)) = setup().await else { return; };
  let services = services(&url);
  let app = test::init_service(
    App::new().wrap(error_pages()).configure(|web| services.web_config(web))
  ).await;

  let taken = unique("taken");
  db.tag.store(&taken).await.unwrap();
  let old = unique("old");
  let tag_id = db.tag.store(&old).await.unwrap();

  let req = test::TestRequest::post()
    .uri(&format!("/tags/{}/edit", tag_id))
    .set_form(vec![("add-tag", taken.as_str())])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::FOUND);
  assert!(location(&resp).starts_with(&format!("/tags/{}/edit?flash=", tag_id)));
  assert_eq!(db.tag.get_by_id(tag_id).await.unwrap().unwrap().name, old);

  let renamed = unique("renamed");
  let req = test::TestRequest::post()
    .uri(&format!("/tags/{}/edit", tag_id))
    .set_form(vec![("add-tag", renamed.as_str())])
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(location(&resp), format!("/tags/{}", tag_id));
  assert_eq!(db.tag.get_by_id(tag_id).await.unwrap().unwrap().name, renamed);
}

#[actix_web::test]
async fn delete_tag_keeps_posts() {
  let Some((url, db)) = setup().await else { return; };
  let services = services(&url);
  let app = test::init_service(
    App::new().wrap(error_pages()).configure(|web| services.web_config(web))
  ).await;

  let user_id = db.user.store(&UserData {
    first_name: unique("Tagger"),
    last_name: "Doe".to_string(),
    image_url: None,
  }).await.unwrap();
  let tag_id = db.tag.store(&unique("temp")).await.unwrap();
  let post_id = db.post.store(user_id, &PostData {
    title: "Survivor".to_string(),
    content: "Body".to_string(),
    tag_ids: vec![tag_id],
  }).await.unwrap();

  // tag page lists the post first.
  let req = test::TestRequest::get().uri(&format!("/tags/{}", tag_id)).to_request();
  let body = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
  assert!(body.contains(&format!(r#"href="/posts/{}""#, post_id)));

  let req = test::TestRequest::post().uri(&format!("/tags/{}/delete", tag_id)).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::FOUND);
  assert_eq!(location(&resp), "/tags");

  assert!(db.tag.get_by_id(tag_id).await.unwrap().is_none());
  assert!(db.post.get_by_id(post_id).await.unwrap().is_some());
  assert!(db.tag.list_by_post(post_id).await.unwrap().is_empty());

  let req = test::TestRequest::get().uri(&format!("/tags/{}", tag_id)).to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
