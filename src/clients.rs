pub mod youtube;

pub use youtube::{CommentThreadsApi, YouTubeClient, YouTubeConfig};
