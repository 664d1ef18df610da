mod handler;
mod model;

pub use handler::{feed, get_lists, health};
pub use model::{FeedRequest, GetListsRequest};
