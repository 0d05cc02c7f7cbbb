pub mod stage;
pub mod address_resolver;
pub mod pool_resolver;
pub mod orchestrator;

pub use stage::{Enrichment, Selection, SkipReason, StageLimits, StageReport};
pub use address_resolver::AddressResolver;
pub use pool_resolver::PoolResolver;
pub use orchestrator::{
    CollectConfig, EnrichOutcome, Pipeline, PipelineOutcome, PipelineStage, RunSummary,
    DEFAULT_MAX_PAGES, DEFAULT_PAGE_DELAY,
};
