use std::sync::Arc;
use std::time::Duration;

use up_core::{Config, Error, Result, TextGenerator};

pub mod dummy;
pub mod openai;

pub use dummy::DummyGenerator;
pub use openai::OpenAiGenerator;

/// Generation calls can run long on large prompts, so they get a more
/// generous timeout than page fetches.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

pub fn create_generator(kind: &str, config: &Config) -> Result<Arc<dyn TextGenerator>> {
    match kind {
        "openai" => Ok(Arc::new(OpenAiGenerator::new(
            config.generator_api_key.clone(),
            config.model_name.clone(),
            GENERATION_TIMEOUT,
        )?)),
        "dummy" => Ok(Arc::new(DummyGenerator)),
        other => Err(Error::Config(format!(
            "Unknown generator backend: {}",
            other
        ))),
    }
}
