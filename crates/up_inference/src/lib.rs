pub mod enhance;
pub mod gap;
pub mod models;
mod util;

pub use enhance::{
    ContentEnhancer, EnhancedBody, Enhancement, Insertion, ADDITION_CLASS, MAX_SOURCE_CHARS,
    SOURCE_DELIM_CLOSE, SOURCE_DELIM_OPEN,
};
pub use gap::GapAnalyzer;
pub use models::{create_generator, DummyGenerator, OpenAiGenerator};
