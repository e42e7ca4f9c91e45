use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::models::settings::AppSettings;

/// Download a video (or playlist) through yt-dlp, aria2 and ffmpeg.
#[derive(Parser, Debug, Default)]
#[command(name = "dl-video", author, version, about, long_about = None)]
pub struct Args {
    /// Page of the media to download
    pub url: Option<String>,

    /// Prefix playlist entries with their position (`-an` works too)
    #[arg(long)]
    pub autonumber: bool,

    /// Settings file to use instead of the default location
    #[arg(long, env = "DL_VIDEO_CONFIG")]
    pub config: Option<PathBuf>,

    /// aria2 JSON-RPC endpoint
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// aria2 `--rpc-secret`
    #[arg(long, env = "DL_VIDEO_RPC_SECRET")]
    pub rpc_secret: Option<String>,

    /// More output; repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// `-an` predates the long flag and is not a valid clap short option.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if arg == "-an" {
                OsString::from("--autonumber")
            } else {
                arg
            }
        })
        .collect()
}

pub fn parse() -> Args {
    Args::parse_from(normalize_args(std::env::args_os()))
}

impl Args {
    pub fn apply_overrides(&self, settings: &mut AppSettings) {
        if let Some(url) = &self.rpc_url {
            settings.rpc.url = url.clone();
        }
        if let Some(secret) = &self.rpc_secret {
            settings.rpc.secret = Some(secret.clone());
        }
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
