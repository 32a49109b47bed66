pub use common::database::Ulid;

mod comment;
mod follow;
mod group;
mod post;
mod session;
mod user;

pub use comment::Comment;
pub use follow::Follow;
pub use group::Group;
pub use post::Post;
pub use session::Session;
pub use user::User;
