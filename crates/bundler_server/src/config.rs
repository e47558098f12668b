use std::fs;
use std::path::Path;

use anyhow::Context;
use bundler_core::Config;

/// Load and validate the service configuration from a RON file.
///
/// A missing or malformed file is fatal: the service would otherwise run
/// with limits the operator never chose.
pub fn load(path: &Path) -> anyhow::Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("could not read config file {}", path.display()))?;
    let config: Config = ron::from_str(&content)
        .with_context(|| format!("could not parse config file {}", path.display()))?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}
