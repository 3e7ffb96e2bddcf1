pub mod user;
pub mod post;
pub mod tag;
pub use self::{
  user::*,
  post::*,
  tag::*,
};
