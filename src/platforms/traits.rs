use std::path::PathBuf;

use async_trait::async_trait;

use crate::core::process::ToolRunner;
use crate::error::DlResult;
use crate::models::download::DownloadPlan;
use crate::platforms::Platform;

pub struct BuildOptions<'a> {
    /// Root every destination directory hangs off (the working directory for the CLI).
    pub output_root: PathBuf,
    pub autonumber: bool,
    pub extractor: &'a str,
    pub runner: &'a dyn ToolRunner,
}

#[async_trait]
pub trait DownloadSource: Send + Sync {
    fn platform(&self) -> Platform;
    fn can_handle(&self, url: &str) -> bool;
    async fn build_list(&self, url: &str, opts: &BuildOptions<'_>) -> DlResult<DownloadPlan>;
}
