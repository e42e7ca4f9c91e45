use std::path::PathBuf;
use std::time::Duration;

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod platforms;
pub mod storage;

#[cfg(test)]
mod test_support;

use crate::core::aria2::Aria2Client;
use crate::core::dependencies;
use crate::core::http_client;
use crate::core::pipeline::Pipeline;
use crate::core::process::SystemRunner;
use crate::core::registry::SourceRegistry;
use crate::core::subtitles::{KeepVidLookup, SubtitleSource};
use crate::error::{DlError, DlResult};

/// Downloads `args.url` into the working directory and returns the finished files.
pub async fn run(args: cli::Args) -> DlResult<Vec<PathBuf>> {
    let url = args.url.clone().ok_or_else(DlError::missing_url)?;

    let mut settings = storage::config::load_settings(args.config.as_deref())?;
    args.apply_overrides(&mut settings);

    let runner = SystemRunner;
    for tool in dependencies::missing_tools(&runner, &settings.tools).await {
        tracing::warn!("{} does not answer a version probe; is it installed?", tool);
    }

    let daemon = Aria2Client::new(&settings.rpc)?;
    let lookup = if settings.subtitles.enabled {
        let client = http_client::build_client(
            &settings.network,
            Duration::from_secs(settings.subtitles.timeout_secs),
        )?;
        Some(KeepVidLookup::new(client, &settings.subtitles.lookup_base))
    } else {
        None
    };

    let registry = SourceRegistry::with_defaults();
    let pipeline = Pipeline {
        settings: &settings,
        registry: &registry,
        runner: &runner,
        daemon: &daemon,
        subtitles: lookup.as_ref().map(|l| l as &dyn SubtitleSource),
        output_root: std::env::current_dir()?,
        autonumber: args.autonumber,
    };
    pipeline.run(&url).await
}
