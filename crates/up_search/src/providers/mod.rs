pub mod duckduckgo;
pub mod serper;

pub use duckduckgo::DuckDuckGoProvider;
pub use serper::SerperProvider;
