use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be at least 1")]
    LimitTooSmall(&'static str),
}

/// Immutable service parameters, loaded once at process start.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: String,
    pub allowed_extensions: Vec<String>,
    pub max_files_per_task: usize,
    pub max_concurrent_tasks: usize,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_files_per_task == 0 {
            return Err(ConfigError::LimitTooSmall("max_files_per_task"));
        }
        if self.max_concurrent_tasks == 0 {
            return Err(ConfigError::LimitTooSmall("max_concurrent_tasks"));
        }
        Ok(())
    }

    /// Whether the URL's file extension is in the allowed set.
    ///
    /// Extensions are compared case-insensitively and without a leading dot.
    /// A URL that does not parse, or whose final path segment carries no
    /// extension, is never allowed.
    pub fn allows_url(&self, url: &str) -> bool {
        match url_extension(url) {
            Some(ext) => self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext)),
            None => false,
        }
    }
}

/// Extension of the URL's final non-empty path segment; query and fragment
/// are ignored.
fn url_extension(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let segment = parsed.path().rsplit('/').find(|segment| !segment.is_empty())?;
    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_string())
    }
}
