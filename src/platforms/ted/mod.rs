use std::path::Path;

use async_trait::async_trait;

use crate::core::filename::playlist_dir;
use crate::core::ytdlp;
use crate::error::{DlError, DlResult};
use crate::models::download::{DownloadPlan, DownloadTask, PlanEntry};
use crate::models::media::MediaItem;
use crate::platforms::traits::{BuildOptions, DownloadSource};
use crate::platforms::{host_matches, host_of, Platform};

const SUBTITLE_LANG: &str = "en";

pub struct TedSource;

impl Default for TedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TedSource {
    pub fn new() -> Self {
        Self
    }

    pub fn plan_from_items(items: &[MediaItem], opts: &BuildOptions<'_>) -> DlResult<DownloadPlan> {
        let mut plan = DownloadPlan::new(Platform::Ted);

        for item in items {
            let url = item.url.clone().ok_or_else(|| {
                DlError::Metadata(format!("talk {} has no direct media url", item.id))
            })?;
            let dir = playlist_dir(&opts.output_root, item.playlist.as_deref());
            let media_name = item.stripped_filename()?;

            if let Some(track) = item.subtitle(SUBTITLE_LANG) {
                let srt_name = Path::new(&media_name)
                    .with_extension("srt")
                    .to_string_lossy()
                    .into_owned();
                plan.entries.push(PlanEntry::File(
                    DownloadTask::new(dir.clone(), media_name, url).with_item_id(&item.id),
                ));
                plan.entries.push(PlanEntry::File(
                    DownloadTask::new(dir, srt_name, track.url.clone()).with_item_id(&item.id),
                ));
            } else {
                plan.entries.push(PlanEntry::File(
                    DownloadTask::new(dir, media_name, url).with_item_id(&item.id),
                ));
            }
        }

        Ok(plan)
    }
}

#[async_trait]
impl DownloadSource for TedSource {
    fn platform(&self) -> Platform {
        Platform::Ted
    }

    fn can_handle(&self, url: &str) -> bool {
        host_of(url)
            .map(|host| host_matches(&host, "ted.com"))
            .unwrap_or(false)
    }

    async fn build_list(&self, url: &str, opts: &BuildOptions<'_>) -> DlResult<DownloadPlan> {
        let items = ytdlp::dump_json(opts.runner, opts.extractor, &ytdlp::SUBTITLE_ARGS, url).await?;
        tracing::info!("ted: {} talk(s) for {}", items.len(), url);
        Self::plan_from_items(&items, opts)
    }
}
