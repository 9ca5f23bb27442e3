use anyhow::Context;
use rv_config::RvConfig;
use rv_lake::{InventoryLake, LakeError};
use tokio_util::sync::CancellationToken;

use crate::cli::{GlobalFlags, OutputFormat};

/// Everything a command handler needs for one run.
pub struct AppContext {
    pub config: RvConfig,
    pub lake: InventoryLake,
    /// Effective output format after applying `output.pretty`.
    pub format: OutputFormat,
    pub cancel: CancellationToken,
}

impl AppContext {
    /// Open the store named by the configuration.
    pub fn init(
        config: RvConfig,
        flags: &GlobalFlags,
        cancel: CancellationToken,
    ) -> anyhow::Result<Self> {
        let lake = if config.store.is_in_memory() {
            InventoryLake::open_in_memory().context("failed to open in-memory store")?
        } else {
            InventoryLake::open_local(&config.store.path)
                .with_context(|| format!("failed to open store at {}", config.store.path))?
        }
        .with_extension_repository(config.store.extension_repository.clone());

        Ok(Self {
            format: effective_format(flags.format, config.output.pretty),
            lake,
            config,
            cancel,
        })
    }

    /// Fail with [`LakeError::Cancelled`] once Ctrl-C was pressed.
    pub fn checkpoint(&self) -> Result<(), LakeError> {
        if self.cancel.is_cancelled() {
            return Err(LakeError::Cancelled);
        }
        Ok(())
    }
}

fn effective_format(requested: OutputFormat, pretty: bool) -> OutputFormat {
    match requested {
        OutputFormat::Json if !pretty => OutputFormat::Raw,
        other => other,
    }
}
