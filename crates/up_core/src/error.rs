use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Malformed generation output: {0}")]
    MalformedOutput(String),

    #[error("Content preservation violated: {0}")]
    ContentPreservation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Fatal errors abort the whole run; everything else is handled per item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_config_errors_are_fatal() {
        assert!(Error::Config("missing key".to_string()).is_fatal());
        assert!(!Error::Search("provider down".to_string()).is_fatal());
        assert!(!Error::ContentPreservation("body altered".to_string()).is_fatal());
        assert!(!Error::Storage("rejected".to_string()).is_fatal());
    }
}
