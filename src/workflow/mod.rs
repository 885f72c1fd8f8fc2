pub mod research_flow;
pub mod search_ctx;

pub use research_flow::{ResearchFlow, ResearchOutcome};
pub use search_ctx::SearchCtx;
