use chrono::NaiveDateTime;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
  pub id: i32,
  pub title: String,
  pub content: String,
  pub created_at: NaiveDateTime,
  pub user_id: i32,
}

/// A post together with the name of the user that owns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostDetails {
  #[serde(flatten)]
  pub post: Post,
  pub author_name: String,
}
