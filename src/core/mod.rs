pub mod aria2;
pub mod dependencies;
pub mod ffmpeg;
pub mod filename;
pub mod format_selector;
pub mod http_client;
pub mod media_processor;
pub mod paths;
pub mod pipeline;
pub mod process;
pub mod registry;
pub mod scheduler;
pub mod subtitles;
pub mod ytdlp;
