use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub schema_version: u32,
    pub tools: ToolSettings,
    pub rpc: RpcSettings,
    pub scheduler: SchedulerSettings,
    pub subtitles: SubtitleSettings,
    pub network: ProxySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub extractor: String,
    pub transcoder: String,
    /// Rewrap finished `.f4v` files as `.mp4`.
    pub remux_f4v: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcSettings {
    pub url: String,
    pub secret: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    pub poll_interval_secs: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleSettings {
    pub enabled: bool,
    pub lookup_base: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub enabled: bool,
    pub proxy_type: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            extractor: "yt-dlp".into(),
            transcoder: "ffmpeg".into(),
            remux_f4v: cfg!(target_os = "macos"),
        }
    }
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:6800/jsonrpc".into(),
            secret: None,
            timeout_secs: 30,
        }
    }
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: 3,
            max_retries: 3,
        }
    }
}

impl Default for SubtitleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            lookup_base: "http://keepvid.com".into(),
            timeout_secs: 20,
        }
    }
}
