use serde::{Deserialize, Serialize};

use crate::forms::{required, optional, Invalid};
use crate::models::User;

pub const NAME_MAX_LEN: usize = 50;
pub const IMAGE_URL_MAX_LEN: usize = 255;

/// Submitted add/edit user form.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserForm {
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name: String,
  #[serde(default)]
  pub image_url: String,
}

/// Validated user attributes, ready to store.
#[derive(Debug, Clone, PartialEq)]
pub struct UserData {
  pub first_name: String,
  pub last_name: String,
  pub image_url: Option<String>,
}

impl UserForm {
  pub fn validate(&self) -> Result<UserData, Invalid> {
    Ok(UserData {
      first_name: required("First name", &self.first_name, NAME_MAX_LEN)?,
      last_name: required("Last name", &self.last_name, NAME_MAX_LEN)?,
      image_url: optional("Image URL", &self.image_url, IMAGE_URL_MAX_LEN)?,
    })
  }
}

impl From<&User> for UserForm {
  fn from(user: &User) -> Self {
    UserForm {
      first_name: user.first_name.clone(),
      last_name: user.last_name.clone(),
      image_url: user.image_url.clone().unwrap_or_default(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn valid_user() {
    let form = UserForm {
      first_name: "John".into(),
      last_name: " Doe ".into(),
      image_url: "".into(),
    };
    assert_eq!(form.validate(), Ok(UserData {
      first_name: "John".into(),
      last_name: "Doe".into(),
      image_url: None,
    }));
  }

  #[test]
  fn missing_last_name() {
    let form = UserForm {
      first_name: "John".into(),
      ..Default::default()
    };
    assert_eq!(form.validate(), Err(Invalid("Last name is required.".into())));
  }

  #[test]
  fn decodes_urlencoded_body() {
    let form: UserForm = serde_urlencoded::from_str(
      "first_name=John&last_name=Doe&image_url=example.com").unwrap();
    assert_eq!(form.image_url, "example.com");
    // missing fields decode as empty and fail validation later.
    let form: UserForm = serde_urlencoded::from_str("first_name=John").unwrap();
    assert!(form.validate().is_err());
  }
}
