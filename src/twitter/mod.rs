// Twitter 上游接口
// 包含资源路径、OAuth 签名和 HTTP 客户端

pub mod client;
pub mod endpoint;
pub mod errors;
pub mod oauth;

pub use client::{TwitterClient, Upstream};
pub use endpoint::{Endpoint, ParamValue, UpstreamParameters};
pub use errors::UpstreamError;
