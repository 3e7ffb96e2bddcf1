pub mod user;
pub mod post;
pub mod tag;
pub use self::{
  user::*,
  post::*,
  tag::*,
};

/// A submitted form failed validation.  The message is shown back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalid(pub String);

/// Trim a required text field and check it fits its column.
pub fn required(label: &str, value: &str, max_len: usize) -> Result<String, Invalid> {
  let value = value.trim();
  if value.is_empty() {
    return Err(Invalid(format!("{} is required.", label)));
  }
  check_value(label, value, max_len)?;
  Ok(value.to_string())
}

/// Trim an optional text field, empty means absent.
pub fn optional(label: &str, value: &str, max_len: usize) -> Result<Option<String>, Invalid> {
  let value = value.trim();
  if value.is_empty() {
    return Ok(None);
  }
  check_value(label, value, max_len)?;
  Ok(Some(value.to_string()))
}

fn check_value(label: &str, value: &str, max_len: usize) -> Result<(), Invalid> {
  // postgres text can't hold NUL.
  if value.contains('\0') {
    return Err(Invalid(format!("{} contains an invalid character.", label)));
  }
  if value.chars().count() > max_len {
    return Err(Invalid(format!("{} must be at most {} characters.", label, max_len)));
  }
  Ok(())
}
