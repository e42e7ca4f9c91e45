use async_trait::async_trait;

use crate::core::filename::final_file_name;
use crate::core::ytdlp;
use crate::error::{DlError, DlResult};
use crate::models::download::{DownloadPlan, DownloadTask, PlanEntry};
use crate::models::media::MediaItem;
use crate::platforms::traits::{BuildOptions, DownloadSource};
use crate::platforms::Platform;

pub struct GenericYtdlpSource;

impl Default for GenericYtdlpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GenericYtdlpSource {
    pub fn new() -> Self {
        Self
    }

    /// Every record is treated as a part of one file joined after download.
    pub fn plan_from_items(
        url: &str,
        items: &[MediaItem],
        opts: &BuildOptions<'_>,
    ) -> DlResult<DownloadPlan> {
        let first = items
            .first()
            .ok_or_else(|| DlError::UnsupportedSource(url.to_string()))?;

        let mut plan = DownloadPlan::new(Platform::Generic);
        for item in items {
            let part_url = item.url.clone().ok_or_else(|| {
                DlError::Metadata(format!("record {} has no direct media url", item.id))
            })?;
            plan.entries.push(PlanEntry::File(DownloadTask::new(
                opts.output_root.clone(),
                item.output_name()?,
                part_url,
            )));
        }

        plan.final_name = Some(final_file_name(&first.title, &first.ext));
        Ok(plan)
    }
}

#[async_trait]
impl DownloadSource for GenericYtdlpSource {
    fn platform(&self) -> Platform {
        Platform::Generic
    }

    fn can_handle(&self, url: &str) -> bool {
        if let Ok(parsed) = url::Url::parse(url) {
            let scheme = parsed.scheme();
            return scheme == "http" || scheme == "https";
        }
        false
    }

    async fn build_list(&self, url: &str, opts: &BuildOptions<'_>) -> DlResult<DownloadPlan> {
        let items = match ytdlp::dump_json(opts.runner, opts.extractor, &[], url).await {
            Ok(items) => items,
            Err(DlError::Metadata(msg)) => {
                tracing::warn!("extractor gave nothing for {}: {}", url, msg);
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        tracing::info!("generic: {} part(s) for {}", items.len(), url);
        Self::plan_from_items(url, &items, opts)
    }
}
