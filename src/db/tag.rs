use tokio_postgres::Row;

use crate::error::*;
use crate::models::*;

use crate::db::*;
use crate::db::util::*;

#[derive(Clone)]
pub struct TagService {
  list_tags: PreparedQuery,
  tag_by_id: PreparedQuery,
  tags_by_post: PreparedQuery,

  store_tag: PreparedQuery,
  update_tag: PreparedQuery,
  delete_tag: PreparedQuery,
}

lazy_static! {
  static ref TAG_COLUMNS: ColumnMappers = {
    ColumnMappers {
      table_name: "tags",
      columns: vec![
        primary("id"),
        column("name"),
      ],
    }
  };
}

// Posts keep existing, only their links to the tag go.
static DELETE_TAG: &str = r#"
WITH removed_links AS (
  DELETE FROM posts_tags WHERE tag_id = $1
)
DELETE FROM tags WHERE id = $1 RETURNING id
"#;

fn tag_from_row(row: &Row) -> Tag {
  Tag {
    id: row.get(0),
    name: row.get(1),
  }
}

impl TagService {
  pub fn new(cl: SharedClient) -> TagService {
    let select = TAG_COLUMNS.build_select_query();

    TagService {
      list_tags: PreparedQuery::new(cl.clone(),
        &format!("{} ORDER BY id", select)),
      tag_by_id: PreparedQuery::new(cl.clone(),
        &format!("{} WHERE id = $1", select)),
      tags_by_post: PreparedQuery::new(cl.clone(),
        &format!("SELECT {} FROM tags t INNER JOIN posts_tags pt ON pt.tag_id = t.id \
          WHERE pt.post_id = $1 ORDER BY t.name", TAG_COLUMNS.get_columns(Some("t")))),
      store_tag: PreparedQuery::new(cl.clone(),
        &TAG_COLUMNS.build_insert_query()),
      update_tag: PreparedQuery::new(cl.clone(),
        &TAG_COLUMNS.build_update_where("id")),
      delete_tag: PreparedQuery::new(cl, DELETE_TAG),
    }
  }

  pub async fn prepare(&self) -> Result<()> {
    self.list_tags.prepare().await?;
    self.tag_by_id.prepare().await?;
    self.tags_by_post.prepare().await?;
    self.store_tag.prepare().await?;
    self.update_tag.prepare().await?;
    self.delete_tag.prepare().await?;
    Ok(())
  }

  pub async fn list(&self) -> Result<Vec<Tag>> {
    let rows = self.list_tags.query(&[]).await?;
    Ok(rows.iter().map(tag_from_row).collect())
  }

  pub async fn get_by_id(&self, tag_id: i32) -> Result<Option<Tag>> {
    let row = self.tag_by_id.query_opt(&[&tag_id]).await?;
    Ok(row.as_ref().map(tag_from_row))
  }

  pub async fn list_by_post(&self, post_id: i32) -> Result<Vec<Tag>> {
    let rows = self.tags_by_post.query(&[&post_id]).await?;
    Ok(rows.iter().map(tag_from_row).collect())
  }

  /// Insert a new tag.  A taken name fails with `Error::UniqueViolation`.
  pub async fn store(&self, name: &str) -> Result<i32> {
    let row = self.store_tag.query_one(&[&name]).await?;
    Ok(row.get(0))
  }

  pub async fn update(&self, tag_id: i32, name: &str) -> Result<()> {
    let updated = self.update_tag.execute(&[&name, &tag_id]).await?;
    if updated == 0 {
      return Err(Error::not_found("tag", tag_id));
    }
    Ok(())
  }

  /// Delete a tag, unlinking it from every post.
  pub async fn delete(&self, tag_id: i32) -> Result<()> {
    match self.delete_tag.query_opt(&[&tag_id]).await? {
      Some(_) => Ok(()),
      None => Err(Error::not_found("tag", tag_id)),
    }
  }
}
