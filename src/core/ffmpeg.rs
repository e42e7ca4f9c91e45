use std::path::Path;

use crate::core::process::ToolRunner;
use crate::error::{DlError, DlResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCodec {
    Copy,
    Mp3,
}

impl AudioCodec {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCodec::Copy => "copy",
            AudioCodec::Mp3 => "mp3",
        }
    }

    /// Opus in webm cannot be stream-copied into mp4; everything else can.
    pub fn for_pair(audio: &Path, video: &Path) -> Self {
        let ext = |p: &Path| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
        };
        if ext(audio).as_deref() == Some("webm") && ext(video).as_deref() == Some("mp4") {
            AudioCodec::Mp3
        } else {
            AudioCodec::Copy
        }
    }
}

fn path_arg(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}

pub struct Transcoder<'a> {
    runner: &'a dyn ToolRunner,
    program: &'a str,
}

impl<'a> Transcoder<'a> {
    pub fn new(runner: &'a dyn ToolRunner, program: &'a str) -> Self {
        Self { runner, program }
    }

    async fn run(&self, what: &str, args: Vec<String>) -> DlResult<()> {
        let output = self
            .runner
            .run(self.program, &args)
            .await
            .map_err(|e| DlError::PostProcess(format!("{}: {}", what, e)))?;

        if !output.success() {
            let stderr = output.stderr_lossy();
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            tracing::warn!("{} {} failed: {:?}", self.program, what, tail);
            return Err(DlError::PostProcess(format!(
                "{} {} exited with {:?}",
                self.program, what, output.code
            )));
        }

        Ok(())
    }

    pub async fn mux_video_audio(
        &self,
        video: &Path,
        audio: &Path,
        output: &Path,
        acodec: AudioCodec,
    ) -> DlResult<()> {
        let args = vec![
            "-y".into(),
            "-i".into(),
            path_arg(video),
            "-i".into(),
            path_arg(audio),
            "-map".into(),
            "0:0".into(),
            "-map".into(),
            "1:0".into(),
            "-vcodec".into(),
            "copy".into(),
            "-acodec".into(),
            acodec.as_str().into(),
            path_arg(output),
        ];
        self.run("mux", args).await
    }

    /// Joins the files listed in an ffmpeg concat-demuxer manifest.
    pub async fn concat(&self, manifest: &Path, output: &Path) -> DlResult<()> {
        let args = vec![
            "-y".into(),
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            path_arg(manifest),
            "-c".into(),
            "copy".into(),
            path_arg(output),
        ];
        self.run("concat", args).await
    }

    pub async fn remux(&self, input: &Path, output: &Path) -> DlResult<()> {
        let args = vec![
            "-y".into(),
            "-i".into(),
            path_arg(input),
            "-vcodec".into(),
            "copy".into(),
            "-acodec".into(),
            "copy".into(),
            path_arg(output),
        ];
        self.run("remux", args).await
    }
}

/// Escapes a path for a `file '...'` line of a concat manifest.
pub fn concat_manifest_line(name: &str) -> String {
    format!("file '{}'\n", name.replace('\'', "'\\''"))
}
