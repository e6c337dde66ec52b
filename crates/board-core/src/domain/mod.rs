//! Domain entities - the core business objects.

mod user;

mod post;

pub use post::{Post, PostWithAuthor};
pub use user::User;
