use std::path::PathBuf;
use std::time::Duration;

use crate::core::ffmpeg::Transcoder;
use crate::core::media_processor::MediaProcessor;
use crate::core::process::ToolRunner;
use crate::core::registry::SourceRegistry;
use crate::core::scheduler::{DownloadDaemon, Scheduler};
use crate::core::subtitles::SubtitleSource;
use crate::error::{DlError, DlResult};
use crate::models::settings::AppSettings;
use crate::platforms::traits::BuildOptions;

/// One URL from metadata to final files.
pub struct Pipeline<'a> {
    pub settings: &'a AppSettings,
    pub registry: &'a SourceRegistry,
    pub runner: &'a dyn ToolRunner,
    pub daemon: &'a dyn DownloadDaemon,
    pub subtitles: Option<&'a dyn SubtitleSource>,
    pub output_root: PathBuf,
    pub autonumber: bool,
}

impl<'a> Pipeline<'a> {
    pub async fn run(&self, url: &str) -> DlResult<Vec<PathBuf>> {
        let source = self
            .registry
            .find_source(url)
            .ok_or_else(|| DlError::UnsupportedSource(url.to_string()))?;
        tracing::info!("{} handled by {}", url, source.platform());

        let opts = BuildOptions {
            output_root: self.output_root.clone(),
            autonumber: self.autonumber,
            extractor: &self.settings.tools.extractor,
            runner: self.runner,
        };
        let plan = source.build_list(url, &opts).await?;
        if plan.is_empty() {
            return Err(DlError::UnsupportedSource(url.to_string()));
        }

        for task in plan.tasks() {
            if !task.dir.exists() {
                tokio::fs::create_dir_all(&task.dir).await?;
            }
        }

        let report = Scheduler::new(self.daemon)
            .with_poll_interval(Duration::from_secs(self.settings.scheduler.poll_interval_secs))
            .with_max_retries(self.settings.scheduler.max_retries)
            .run(&plan.tasks())
            .await?;
        tracing::debug!(
            "{} task(s) done in {} round(s), {} retries",
            report.gids.len(),
            report.rounds,
            report.retries.iter().sum::<u32>()
        );

        let mut processor =
            MediaProcessor::new(Transcoder::new(self.runner, &self.settings.tools.transcoder))
                .with_f4v_remux(self.settings.tools.remux_f4v);
        if let Some(subtitles) = self.subtitles {
            processor = processor.with_subtitles(subtitles);
        }
        processor.finish(&plan).await
    }
}
