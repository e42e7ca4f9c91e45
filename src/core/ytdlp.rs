use crate::core::process::ToolRunner;
use crate::error::{DlError, DlResult};
use crate::models::media::MediaItem;

/// Flags asking the extractor to resolve an English srt track alongside each record.
pub const SUBTITLE_ARGS: [&str; 5] = ["--sub-format", "srt", "--sub-lang", "en", "--write-sub"];

/// Runs `<extractor> [extra] -j <url>` and parses one record per stdout line.
pub async fn dump_json(
    runner: &dyn ToolRunner,
    extractor: &str,
    extra_args: &[&str],
    url: &str,
) -> DlResult<Vec<MediaItem>> {
    let mut args: Vec<String> = extra_args.iter().map(|s| s.to_string()).collect();
    args.push("-j".to_string());
    args.push(url.to_string());

    let output = runner
        .run(extractor, &args)
        .await
        .map_err(|e| DlError::Metadata(e.to_string()))?;

    let items = parse_records(&output.stdout_lossy());

    if !output.success() {
        let stderr = output.stderr_lossy();
        if items.is_empty() {
            return Err(DlError::Metadata(format!(
                "{} exited with {:?}: {}",
                extractor,
                output.code,
                stderr.trim()
            )));
        }
        tracing::warn!(
            "{} exited with {:?} after {} records: {}",
            extractor,
            output.code,
            items.len(),
            stderr.trim()
        );
    }

    Ok(items)
}

pub fn parse_records(stdout: &str) -> Vec<MediaItem> {
    stdout
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<MediaItem>(line) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!("skipping unparsable extractor line: {}", e);
                None
            }
        })
        .collect()
}
