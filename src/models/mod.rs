pub mod discovered;
pub mod mix;
pub mod progress;
pub mod vendor;

pub use discovered::DiscoveredSet;
pub use mix::{CategoryMix, WorkItem};
pub use progress::{ProgressState, ProgressTracker};
pub use vendor::{
    guess_website, DiscoveredEntity, EnrichedRecord, Interpretation, NormalizedCategory,
    ResearchPayload,
};
