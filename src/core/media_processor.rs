use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::ffmpeg::{concat_manifest_line, AudioCodec, Transcoder};
use crate::core::subtitles::SubtitleSource;
use crate::error::{DlError, DlResult};
use crate::models::download::{DownloadPlan, DownloadTask, PlanEntry};
use crate::platforms::Platform;

/// Turns the files the daemon left behind into the artifacts the user asked for.
pub struct MediaProcessor<'a> {
    transcoder: Transcoder<'a>,
    subtitles: Option<&'a dyn SubtitleSource>,
    remux_f4v: bool,
}

impl<'a> MediaProcessor<'a> {
    pub fn new(transcoder: Transcoder<'a>) -> Self {
        Self {
            transcoder,
            subtitles: None,
            remux_f4v: cfg!(target_os = "macos"),
        }
    }

    pub fn with_subtitles(mut self, source: &'a dyn SubtitleSource) -> Self {
        self.subtitles = Some(source);
        self
    }

    /// Players on macOS choke on f4v; rewrap it as mp4 when enabled.
    pub fn with_f4v_remux(mut self, enabled: bool) -> Self {
        self.remux_f4v = enabled;
        self
    }

    pub async fn finish(&self, plan: &DownloadPlan) -> DlResult<Vec<PathBuf>> {
        let produced = match plan.platform {
            Platform::YouTube => self.merge_pairs(plan).await?,
            Platform::Ted => plan.tasks().iter().map(DownloadTask::path).collect(),
            Platform::Generic => self.join_parts(plan).await?.into_iter().collect(),
        };

        let mut finals = Vec::with_capacity(produced.len());
        for path in produced {
            finals.push(self.modernize_container(path).await?);
        }
        Ok(finals)
    }

    async fn merge_pairs(&self, plan: &DownloadPlan) -> DlResult<Vec<PathBuf>> {
        let mut merged = Vec::new();

        for entry in &plan.entries {
            match entry {
                PlanEntry::AvPair {
                    item_id,
                    audio,
                    video,
                } => {
                    let audio_path = audio.path();
                    let video_path = video.path();
                    let output = merged_output_path(&video_path);
                    let acodec = AudioCodec::for_pair(&audio_path, &video_path);

                    tracing::info!("merging {} ({})", output.display(), acodec.as_str());
                    self.transcoder
                        .mux_video_audio(&video_path, &audio_path, &output, acodec)
                        .await?;

                    tokio::fs::remove_file(&video_path).await?;
                    tokio::fs::remove_file(&audio_path).await?;

                    self.fetch_subtitle(item_id, &output.with_extension("srt"))
                        .await;
                    merged.push(output);
                }
                PlanEntry::File(task) => merged.push(task.path()),
            }
        }

        Ok(merged)
    }

    /// Best effort; a missing or failing lookup never fails the run.
    async fn fetch_subtitle(&self, item_id: &str, target: &Path) {
        let Some(source) = self.subtitles else {
            return;
        };

        match source.fetch(item_id).await {
            Ok(Some(text)) => match tokio::fs::write(target, text).await {
                Ok(()) => tracing::info!("finish: {}", target.display()),
                Err(e) => tracing::debug!("cannot write {}: {}", target.display(), e),
            },
            Ok(None) => tracing::debug!("no subtitle found for {}", item_id),
            Err(e) => tracing::debug!("subtitle lookup for {} failed: {}", item_id, e),
        }
    }

    async fn join_parts(&self, plan: &DownloadPlan) -> DlResult<Option<PathBuf>> {
        let tasks = plan.tasks();
        let Some(first) = tasks.first() else {
            return Ok(None);
        };
        let final_name = plan
            .final_name
            .as_deref()
            .ok_or_else(|| DlError::Metadata("no final file name for joined download".into()))?;
        let final_path = first.dir.join(final_name);

        if tasks.len() == 1 {
            let part = first.path();
            if !part.exists() {
                tracing::warn!("{} not found, nothing to rename", part.display());
                return Ok(None);
            }
            if part != final_path {
                tokio::fs::rename(&part, &final_path).await?;
            }
            return Ok(Some(final_path));
        }

        let mut manifest = tempfile::Builder::new()
            .prefix("dl-video-")
            .suffix(".txt")
            .tempfile_in(&first.dir)?;
        for task in &tasks {
            manifest.write_all(concat_manifest_line(&task.out).as_bytes())?;
        }
        manifest.flush()?;

        // ffmpeg must not write over a part it is still reading
        let ext = Path::new(final_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let joined = tempfile::Builder::new()
            .prefix(".dl-video-")
            .suffix(&ext)
            .tempfile_in(&first.dir)?
            .into_temp_path();

        tracing::info!("joining {} parts into {}", tasks.len(), final_path.display());
        self.transcoder.concat(manifest.path(), &joined).await?;
        joined
            .persist(&final_path)
            .map_err(|e| DlError::Io(e.error))?;

        for task in &tasks {
            let part = task.path();
            if part != final_path {
                tokio::fs::remove_file(part).await?;
            }
        }
        Ok(Some(final_path))
    }

    async fn modernize_container(&self, path: PathBuf) -> DlResult<PathBuf> {
        let is_f4v = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("f4v"))
            .unwrap_or(false);

        if !self.remux_f4v || !is_f4v || !path.exists() {
            return Ok(path);
        }

        let mp4 = path.with_extension("mp4");
        self.transcoder.remux(&path, &mp4).await?;
        tokio::fs::remove_file(&path).await?;
        Ok(mp4)
    }
}

/// `name-video.webm` → `name.mkv`, `name-video.mp4` → `name.mp4`.
pub fn merged_output_path(video: &Path) -> PathBuf {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = stem.strip_suffix("-video").unwrap_or(&stem);
    let ext = match video.extension().and_then(|e| e.to_str()) {
        Some(e) if e.eq_ignore_ascii_case("webm") => "mkv".to_string(),
        Some(e) => e.to_string(),
        None => "mkv".to_string(),
    };
    video.with_file_name(format!("{}.{}", stem, ext))
}
