use tokio_postgres::Row;

use crate::error::*;
use crate::models::*;
use crate::forms::UserData;

use crate::db::*;
use crate::db::util::*;

#[derive(Clone)]
pub struct UserService {
  // gets
  list_users: PreparedQuery,
  user_by_id: PreparedQuery,

  // store/update user
  store_user: PreparedQuery,
  update_user: PreparedQuery,

  // delete user with their posts
  delete_user: PreparedQuery,
}

lazy_static! {
  static ref USER_COLUMNS: ColumnMappers = {
    ColumnMappers {
      table_name: "users",
      columns: vec![
        primary("id"),
        column("first_name"),
        column("last_name"),
        column("image_url"),
      ],
    }
  };
}

// Posts go first, each with its tag links, then the user.
static DELETE_USER: &str = r#"
WITH user_posts AS (
  SELECT id FROM posts WHERE user_id = $1
), removed_links AS (
  DELETE FROM posts_tags WHERE post_id IN (SELECT id FROM user_posts)
), removed_posts AS (
  DELETE FROM posts WHERE user_id = $1
)
DELETE FROM users WHERE id = $1 RETURNING id
"#;

fn user_from_row(row: &Row) -> User {
  User {
    id: row.get(0),
    first_name: row.get(1),
    last_name: row.get(2),
    image_url: row.get(3),
  }
}

impl UserService {
  pub fn new(cl: SharedClient) -> UserService {
    let select = USER_COLUMNS.build_select_query();

    UserService {
      list_users: PreparedQuery::new(cl.clone(),
        &format!("{} ORDER BY id", select)),
      user_by_id: PreparedQuery::new(cl.clone(),
        &format!("{} WHERE id = $1", select)),
      store_user: PreparedQuery::new(cl.clone(),
        &USER_COLUMNS.build_insert_query()),
      update_user: PreparedQuery::new(cl.clone(),
        &USER_COLUMNS.build_update_where("id")),
      delete_user: PreparedQuery::new(cl, DELETE_USER),
    }
  }

  pub async fn prepare(&self) -> Result<()> {
    self.list_users.prepare().await?;
    self.user_by_id.prepare().await?;
    self.store_user.prepare().await?;
    self.update_user.prepare().await?;
    self.delete_user.prepare().await?;
    Ok(())
  }

  pub async fn list(&self) -> Result<Vec<User>> {
    let rows = self.list_users.query(&[]).await?;
    Ok(rows.iter().map(user_from_row).collect())
  }

  pub async fn get_by_id(&self, user_id: i32) -> Result<Option<User>> {
    let row = self.user_by_id.query_opt(&[&user_id]).await?;
    Ok(row.as_ref().map(user_from_row))
  }

  /// Insert a new user, returns its id.
  pub async fn store(&self, user: &UserData) -> Result<i32> {
    let row = self.store_user.query_one(&[
      &user.first_name, &user.last_name, &user.image_url,
    ]).await?;
    Ok(row.get(0))
  }

  /// Overwrite all attributes of an existing user.
  pub async fn update(&self, user_id: i32, user: &UserData) -> Result<()> {
    let updated = self.update_user.execute(&[
      &user.first_name, &user.last_name, &user.image_url, &user_id,
    ]).await?;
    if updated == 0 {
      return Err(Error::not_found("user", user_id));
    }
    Ok(())
  }

  /// Delete a user together with every post they own.
  pub async fn delete(&self, user_id: i32) -> Result<()> {
    match self.delete_user.query_opt(&[&user_id]).await? {
      Some(_) => Ok(()),
      None => Err(Error::not_found("user", user_id)),
    }
  }
}
