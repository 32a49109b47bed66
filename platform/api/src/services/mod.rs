mod feed;
mod follow;

pub use feed::FeedService;
pub use follow::FollowManager;
