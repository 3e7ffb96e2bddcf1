use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
  pub id: i32,
  pub first_name: String,
  pub last_name: String,
  pub image_url: Option<String>,
}

impl User {
  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}
