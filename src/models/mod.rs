pub mod follow;
pub mod like;
pub mod media;
pub mod tweet;
pub mod user;

pub use follow::{FollowEdge, NewFollowEdge};
pub use like::{LikeDetail, NewTweetLike, TweetLike};
pub use media::{Media, NewMedia};
pub use tweet::{EnrichedTweet, NewTweet, NewTweetMediaLink, Tweet, TweetMediaLink};
pub use user::{User, UserProfile, UserRef};
