pub mod citations;
pub mod orchestrator;

pub use citations::{assemble, CitationBlock};
pub use orchestrator::{ItemOutcome, Pipeline, PipelineOptions, RunSummary};
