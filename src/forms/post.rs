use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::*;
use crate::forms::{required, Invalid};
use crate::models::Post;

pub const TITLE_MAX_LEN: usize = 25;

/// Submitted add/edit post form.
///
/// `tags` may repeat, one value per checked tag, so the body is decoded
/// from raw key/value pairs instead of a derived struct.
#[derive(Debug, Default, Clone, Serialize, PartialEq)]
pub struct PostForm {
  pub title: String,
  pub content: String,
  pub tags: Vec<i32>,
}

/// Validated post attributes.  `tag_ids` is the complete desired tag set.
#[derive(Debug, Clone, PartialEq)]
pub struct PostData {
  pub title: String,
  pub content: String,
  pub tag_ids: Vec<i32>,
}

impl PostForm {
  pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self> {
    let mut form = PostForm::default();
    for (key, value) in pairs {
      match key.as_str() {
        "title" => form.title = value,
        "content" => form.content = value,
        "tags" => {
          let id = value.trim().parse::<i32>()
            .map_err(|_| Error::BadRequest(format!("invalid tag id: {:?}", value)))?;
          form.tags.push(id);
        },
        _ => (),
      }
    }
    Ok(form)
  }

  pub fn validate(&self) -> Result<PostData, Invalid> {
    let tag_ids: BTreeSet<i32> = self.tags.iter().copied().collect();
    Ok(PostData {
      title: required("Title", &self.title, TITLE_MAX_LEN)?,
      content: required("Content", &self.content, usize::MAX)?,
      tag_ids: tag_ids.into_iter().collect(),
    })
  }

  /// Pre-fill the edit form from a stored post and its current tags.
  pub fn from_post(post: &Post, tags: Vec<i32>) -> Self {
    PostForm {
      title: post.title.clone(),
      content: post.content.clone(),
      tags,
    }
  }
}
