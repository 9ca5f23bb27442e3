use anyhow::Context;

use crate::cli::GlobalFlags;

/// Load layered configuration, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<rv_config::RvConfig> {
    let mut config =
        rv_config::RvConfig::load_with_dotenv().context("failed to load configuration")?;

    if let Some(path) = &flags.db_path {
        tracing::debug!(path = %path, "store path overridden on the command line");
        config.store.path.clone_from(path);
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}
