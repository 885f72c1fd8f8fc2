//! 业务能力层（Services Layer）
//!
//! 每个服务只提供一种能力：解读搜索词、按类别找名称、调研单个供应商。
//! 服务内部负责 prompt、重试和响应解析，不关心并发和批次。

pub mod disambiguation;
pub mod prompts;
pub mod response_parser;
pub mod vendor_research;
pub mod vendor_search;

pub use disambiguation::DisambiguationService;
pub use vendor_research::VendorResearch;
pub use vendor_search::VendorSearch;
