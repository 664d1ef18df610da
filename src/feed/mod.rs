// feed 核心：查询分类、推文规范化和请求协调

pub mod coordinator;
pub mod query;
pub mod tweet;

pub use coordinator::{FeedCoordinator, LazyUpstream};
pub use query::{QueryRequest, classify, normalize_hashtags, slugify};
pub use tweet::{OwnedList, Tweet, normalize};
