use async_trait::async_trait;

use crate::core::filename::playlist_dir;
use crate::core::format_selector::FormatSelector;
use crate::core::ytdlp;
use crate::error::DlResult;
use crate::models::download::{DownloadPlan, DownloadTask, PlanEntry};
use crate::models::media::MediaItem;
use crate::platforms::traits::{BuildOptions, DownloadSource};
use crate::platforms::{host_matches, host_of, Platform};

pub struct YouTubeSource;

impl Default for YouTubeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl YouTubeSource {
    pub fn new() -> Self {
        Self
    }

    fn base_name(item: &MediaItem, number: usize, autonumber: bool) -> DlResult<String> {
        let prefix = if autonumber {
            format!("{} - ", number)
        } else {
            String::new()
        };
        Ok(format!("{}{}", prefix, item.stripped_stem()?))
    }

    /// One audio/video pair per record, numbered from 1 in extractor order.
    pub fn plan_from_items(items: &[MediaItem], opts: &BuildOptions<'_>) -> DlResult<DownloadPlan> {
        let mut plan = DownloadPlan::new(Platform::YouTube);

        for (i, item) in items.iter().enumerate() {
            let (audio, video) = FormatSelector::select(item)?;
            let base = Self::base_name(item, i + 1, opts.autonumber)?;
            let dir = playlist_dir(&opts.output_root, item.playlist.as_deref());

            plan.entries.push(PlanEntry::AvPair {
                item_id: item.id.clone(),
                audio: DownloadTask::new(
                    dir.clone(),
                    format!("{}-audio.{}", base, audio.ext),
                    audio.url.clone(),
                )
                .with_item_id(&item.id),
                video: DownloadTask::new(
                    dir,
                    format!("{}-video.{}", base, video.ext),
                    video.url.clone(),
                )
                .with_item_id(&item.id),
            });
        }

        Ok(plan)
    }
}

#[async_trait]
impl DownloadSource for YouTubeSource {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    fn can_handle(&self, url: &str) -> bool {
        match host_of(url) {
            Some(host) => {
                host_matches(&host, "youtube.com")
                    || host == "youtu.be"
                    || host_matches(&host, "youtube-nocookie.com")
            }
            None => false,
        }
    }

    async fn build_list(&self, url: &str, opts: &BuildOptions<'_>) -> DlResult<DownloadPlan> {
        let items = ytdlp::dump_json(opts.runner, opts.extractor, &[], url).await?;
        tracing::info!("youtube: {} item(s) for {}", items.len(), url);
        Self::plan_from_items(&items, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeRunner;
    use std::path::PathBuf;

    const RECORD_1: &str = r#"{"id":"abc123","title":"Show ep1","playlist":"My: List/2","_filename":"Show-ep1-abc123.mp4","ext":"mp4","formats":[
        {"format_note":"DASH audio","ext":"m4a","filesize":100,"url":"http://a/low"},
        {"format_note":"DASH audio","ext":"webm","filesize":200,"url":"http://a/high"},
        {"format_note":"DASH video","ext":"mp4","width":1280,"filesize":5000,"url":"http://v/720"},
        {"format_note":"DASH video","ext":"webm","width":1920,"filesize":9000,"url":"http://v/1080"},
        {"format_note":"hd720","ext":"mp4","width":1280,"filesize":3000,"url":"http://p"}]}"#;

    const RECORD_2: &str = r#"{"id":"def456","title":"Show ep2","playlist":"My: List/2","_filename":"Show-ep2-def456.mp4","ext":"mp4","formats":[
        {"format_note":"DASH audio","ext":"m4a","filesize":100,"url":"http://b/a"},
        {"format_note":"DASH video","ext":"mp4","width":640,"filesize":500,"url":"http://b/v"}]}"#;

    fn opts<'a>(runner: &'a FakeRunner, autonumber: bool) -> BuildOptions<'a> {
        BuildOptions {
            output_root: PathBuf::from("/work"),
            autonumber,
            extractor: "yt-dlp",
            runner,
        }
    }

    #[test]
    fn handles_youtube_hosts_only() {
        let src = YouTubeSource::new();
        assert!(src.can_handle("https://www.youtube.com/watch?v=abc"));
        assert!(src.can_handle("https://youtu.be/abc"));
        assert!(src.can_handle("https://m.youtube.com/playlist?list=x"));
        assert!(!src.can_handle("https://www.ted.com/talks/x"));
        assert!(!src.can_handle("https://notyoutube.com/x"));
        assert!(!src.can_handle("not a url"));
    }

    #[tokio::test]
    async fn two_tasks_per_item_audio_first() {
        let runner = FakeRunner::new();
        runner.respond("yt-dlp", 0, &format!("{}\n{}\n", RECORD_1.replace('\n', ""), RECORD_2.replace('\n', "")));

        let plan = YouTubeSource::new()
            .build_list("https://www.youtube.com/playlist?list=x", &opts(&runner, false))
            .await
            .unwrap();
        let tasks = plan.tasks();

        assert_eq!(tasks.len(), 4);
        for pair in tasks.chunks(2) {
            let expected_video_stem = pair[0].out.replace("-audio", "-video");
            let expected_video_stem = expected_video_stem.rsplit_once('.').unwrap().0;
            assert_eq!(pair[1].out.rsplit_once('.').unwrap().0, expected_video_stem);
            assert_eq!(pair[0].item_id, pair[1].item_id);
        }

        assert_eq!(tasks[0].out, "Show-ep1-audio.webm");
        assert_eq!(tasks[0].url, "http://a/high");
        assert_eq!(tasks[1].out, "Show-ep1-video.webm");
        assert_eq!(tasks[1].url, "http://v/1080");
        assert_eq!(tasks[0].dir, PathBuf::from("/work/My- List_2"));
        assert_eq!(tasks[3].out, "Show-ep2-video.mp4");
    }

    #[tokio::test]
    async fn autonumber_prefixes_one_based_index() {
        let runner = FakeRunner::new();
        runner.respond("yt-dlp", 0, &format!("{}\n{}\n", RECORD_1.replace('\n', ""), RECORD_2.replace('\n', "")));

        let plan = YouTubeSource::new()
            .build_list("https://www.youtube.com/playlist?list=x", &opts(&runner, true))
            .await
            .unwrap();
        let tasks = plan.tasks();
        assert_eq!(tasks[0].out, "1 - Show-ep1-audio.webm");
        assert_eq!(tasks[2].out, "2 - Show-ep2-audio.m4a");
    }

    #[test]
    fn missing_playlist_lands_in_root() {
        let item: MediaItem = serde_json::from_str(
            r#"{"id":"z","_filename":"Clip-z.mp4","formats":[
                {"format_note":"DASH audio","ext":"m4a","url":"a"},
                {"format_note":"DASH video","ext":"mp4","width":10,"url":"v"}]}"#,
        )
        .unwrap();
        let runner = FakeRunner::new();
        let plan = YouTubeSource::plan_from_items(&[item], &opts(&runner, false)).unwrap();
        assert_eq!(plan.tasks()[0].dir, PathBuf::from("/work"));
        assert_eq!(plan.tasks()[0].out, "Clip-audio.m4a");
    }

    #[test]
    fn record_without_filename_is_metadata_error() {
        let item: MediaItem = serde_json::from_str(
            r#"{"id":"z","formats":[
                {"format_note":"DASH audio","ext":"m4a","url":"a"},
                {"format_note":"DASH video","ext":"mp4","width":10,"url":"v"}]}"#,
        )
        .unwrap();
        let runner = FakeRunner::new();
        assert!(matches!(
            YouTubeSource::plan_from_items(&[item], &opts(&runner, false)),
            Err(crate::error::DlError::Metadata(_))
        ));
    }

    #[test]
    fn malformed_formats_fail_the_build() {
        let item: MediaItem =
            serde_json::from_str(r#"{"id":"z","_filename":"Clip-z.mp4","formats":[]}"#).unwrap();
        let runner = FakeRunner::new();
        assert!(YouTubeSource::plan_from_items(&[item], &opts(&runner, false)).is_err());
    }
}
