use tokio_postgres::Row;

use crate::error::*;
use crate::models::*;
use crate::forms::PostData;

use crate::db::*;
use crate::db::util::*;

#[derive(Clone)]
pub struct PostService {
  // get one post
  post_by_id: PreparedQuery,

  // get multiple posts
  list_posts: PreparedQuery,
  posts_by_user: PreparedQuery,
  posts_by_tag: PreparedQuery,

  // store/update post with its tag set
  store_post: PreparedQuery,
  update_post: PreparedQuery,

  // delete post
  delete_post: PreparedQuery,
}

lazy_static! {
  static ref POST_COLUMNS: ColumnMappers = {
    ColumnMappers {
      table_name: "posts",
      columns: vec![
        primary("id"),
        column("title"),
        column("content"),
        column("created_at"),
        column("user_id"),
      ],
    }
  };
}

// Tag ids that don't resolve to a tag are dropped by the join with `tags`.
static STORE_POST: &str = r#"
WITH new_post AS (
  INSERT INTO posts(title, content, user_id) VALUES($1, $2, $3) RETURNING id
), new_links AS (
  INSERT INTO posts_tags(post_id, tag_id)
  SELECT new_post.id, tags.id FROM new_post, tags WHERE tags.id = ANY($4)
)
SELECT id FROM new_post
"#;

// After this statement the post is linked to exactly the tags in $4.
static UPDATE_POST: &str = r#"
WITH updated AS (
  UPDATE posts SET title = $2, content = $3 WHERE id = $1 RETURNING id
), removed_links AS (
  DELETE FROM posts_tags
  WHERE post_id IN (SELECT id FROM updated) AND NOT (tag_id = ANY($4))
), added_links AS (
  INSERT INTO posts_tags(post_id, tag_id)
  SELECT updated.id, tags.id FROM updated, tags WHERE tags.id = ANY($4)
  ON CONFLICT (post_id, tag_id) DO NOTHING
)
SELECT id FROM updated
"#;

static DELETE_POST: &str = r#"
WITH removed_links AS (
  DELETE FROM posts_tags WHERE post_id = $1
)
DELETE FROM posts WHERE id = $1 RETURNING user_id
"#;

fn post_details_from_row(row: &Row) -> PostDetails {
  PostDetails {
    post: Post {
      id: row.get(0),
      title: row.get(1),
      content: row.get(2),
      created_at: row.get(3),
      user_id: row.get(4),
    },
    author_name: row.get(5),
  }
}

impl PostService {
  pub fn new(cl: SharedClient) -> PostService {
    let select = format!(
      "SELECT {}, u.first_name || ' ' || u.last_name AS author_name \
      FROM posts p INNER JOIN users u ON u.id = p.user_id",
      POST_COLUMNS.get_columns(Some("p")));

    PostService {
      post_by_id: PreparedQuery::new(cl.clone(),
        &format!("{} WHERE p.id = $1", select)),
      list_posts: PreparedQuery::new(cl.clone(),
        &format!("{} ORDER BY p.id", select)),
      posts_by_user: PreparedQuery::new(cl.clone(),
        &format!("{} WHERE p.user_id = $1 ORDER BY p.id", select)),
      posts_by_tag: PreparedQuery::new(cl.clone(),
        &format!("{} INNER JOIN posts_tags pt ON pt.post_id = p.id \
          WHERE pt.tag_id = $1 ORDER BY p.id", select)),
      store_post: PreparedQuery::new(cl.clone(), STORE_POST),
      update_post: PreparedQuery::new(cl.clone(), UPDATE_POST),
      delete_post: PreparedQuery::new(cl, DELETE_POST),
    }
  }

  pub async fn prepare(&self) -> Result<()> {
    self.post_by_id.prepare().await?;
    self.list_posts.prepare().await?;
    self.posts_by_user.prepare().await?;
    self.posts_by_tag.prepare().await?;
    self.store_post.prepare().await?;
    self.update_post.prepare().await?;
    self.delete_post.prepare().await?;
    Ok(())
  }

  pub async fn get_by_id(&self, post_id: i32) -> Result<Option<PostDetails>> {
    let row = self.post_by_id.query_opt(&[&post_id]).await?;
    Ok(row.as_ref().map(post_details_from_row))
  }

  pub async fn list(&self) -> Result<Vec<PostDetails>> {
    let rows = self.list_posts.query(&[]).await?;
    Ok(rows.iter().map(post_details_from_row).collect())
  }

  pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<PostDetails>> {
    let rows = self.posts_by_user.query(&[&user_id]).await?;
    Ok(rows.iter().map(post_details_from_row).collect())
  }

  pub async fn list_by_tag(&self, tag_id: i32) -> Result<Vec<PostDetails>> {
    let rows = self.posts_by_tag.query(&[&tag_id]).await?;
    Ok(rows.iter().map(post_details_from_row).collect())
  }

  /// Insert a post owned by `user_id` and link it to its tags, returns the new id.
  pub async fn store(&self, user_id: i32, post: &PostData) -> Result<i32> {
    let row = self.store_post.query_one(&[
      &post.title, &post.content, &user_id, &post.tag_ids,
    ]).await?;
    Ok(row.get(0))
  }

  /// Overwrite title and content, and replace the post's tag set.
  pub async fn update(&self, post_id: i32, post: &PostData) -> Result<()> {
    match self.update_post.query_opt(&[
      &post_id, &post.title, &post.content, &post.tag_ids,
    ]).await? {
      Some(_) => Ok(()),
      None => Err(Error::not_found("post", post_id)),
    }
  }

  /// Delete a post and its tag links, returns the id of the owning user.
  pub async fn delete(&self, post_id: i32) -> Result<i32> {
    match self.delete_post.query_opt(&[&post_id]).await? {
      Some(row) => Ok(row.get(0)),
      None => Err(Error::not_found("post", post_id)),
    }
  }
}
