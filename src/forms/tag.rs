use serde::{Deserialize, Serialize};

use crate::forms::{required, Invalid};

pub const TAG_NAME_MAX_LEN: usize = 50;

/// Submitted add/edit tag form.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct TagForm {
  #[serde(rename = "add-tag", default)]
  pub name: String,
}

impl TagForm {
  pub fn validate(&self) -> Result<String, Invalid> {
    required("Tag name", &self.name, TAG_NAME_MAX_LEN)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_add_tag_field() {
    let form: TagForm = serde_urlencoded::from_str("add-tag=+rust+").unwrap();
    assert_eq!(form.validate(), Ok("rust".to_string()));
  }

  #[test]
  fn blank_name_is_invalid() {
    let form: TagForm = serde_urlencoded::from_str("").unwrap();
    assert_eq!(form.validate(), Err(Invalid("Tag name is required.".into())));
  }
}
