pub mod likes;
pub mod media;
pub mod social_graph;
pub mod tweets;
pub mod users;
