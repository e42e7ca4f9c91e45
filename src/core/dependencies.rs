use crate::core::process::ToolRunner;
use crate::models::settings::ToolSettings;

fn version_flag_for(tool: &str) -> &'static str {
    let name = std::path::Path::new(tool)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(tool);
    match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    }
}

pub async fn check_version(runner: &dyn ToolRunner, tool: &str) -> Option<String> {
    let output = runner
        .run(tool, &[version_flag_for(tool).to_string()])
        .await
        .ok()?;

    if !output.success() {
        return None;
    }

    output
        .stdout_lossy()
        .lines()
        .next()
        .map(|l| l.trim().to_string())
}

pub async fn missing_tools(runner: &dyn ToolRunner, tools: &ToolSettings) -> Vec<String> {
    let mut missing = Vec::new();
    for tool in [&tools.extractor, &tools.transcoder] {
        match check_version(runner, tool).await {
            Some(version) => tracing::debug!("{} found: {}", tool, version),
            None => missing.push(tool.clone()),
        }
    }
    missing
}
