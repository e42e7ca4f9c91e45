use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DlError, DlResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatKind {
    AudioOnly,
    VideoOnly,
    Other,
}

/// One encoding of a media item as reported by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatDescriptor {
    #[serde(default)]
    pub ext: String,
    #[serde(default)]
    pub format_note: Option<String>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub url: String,
}

fn codec_present(codec: Option<&str>) -> bool {
    codec.map(|c| !c.is_empty() && c != "none").unwrap_or(false)
}

impl FormatDescriptor {
    pub fn kind(&self) -> FormatKind {
        let note = self.format_note.as_deref().unwrap_or("");
        let vcodec = self.vcodec.as_deref();
        let acodec = self.acodec.as_deref();

        if note.contains("DASH audio") || (vcodec == Some("none") && codec_present(acodec)) {
            FormatKind::AudioOnly
        } else if note.contains("DASH video") || (acodec == Some("none") && codec_present(vcodec))
        {
            FormatKind::VideoOnly
        } else {
            FormatKind::Other
        }
    }

    pub fn width(&self) -> u32 {
        self.width.unwrap_or(0)
    }

    /// Unknown sizes sort last so they never win a tie-break.
    pub fn size_or_max(&self) -> u64 {
        self.filesize.unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtitleTrack {
    pub url: String,
    #[serde(default)]
    pub ext: Option<String>,
}

/// One extractor record (`-j` prints one per line).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub playlist: Option<String>,
    #[serde(default)]
    pub formats: Vec<FormatDescriptor>,
    #[serde(rename = "_filename", alias = "filename", default)]
    pub filename: String,
    #[serde(default)]
    pub ext: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub requested_subtitles: Option<BTreeMap<String, SubtitleTrack>>,
}

impl MediaItem {
    /// `_filename`; every builder names its downloads after it.
    pub fn output_name(&self) -> DlResult<&str> {
        if self.filename.trim().is_empty() {
            return Err(DlError::Metadata(format!(
                "record {} has no _filename",
                self.id
            )));
        }
        Ok(&self.filename)
    }

    /// `_filename` without its extension and without the id token the extractor adds.
    pub fn stripped_stem(&self) -> DlResult<String> {
        let stem = Path::new(self.output_name()?).with_extension("");
        Ok(strip_id(&stem.to_string_lossy(), &self.id))
    }

    /// `_filename` with the id token removed, extension kept.
    pub fn stripped_filename(&self) -> DlResult<String> {
        Ok(strip_id(self.output_name()?, &self.id))
    }

    pub fn subtitle(&self, preferred_lang: &str) -> Option<&SubtitleTrack> {
        let subs = self.requested_subtitles.as_ref()?;
        subs.get(preferred_lang).or_else(|| subs.values().next())
    }
}

/// Removes `-{id}` (youtube-dl naming) or ` [{id}]` (yt-dlp naming).
pub fn strip_id(name: &str, id: &str) -> String {
    if id.is_empty() {
        return name.to_string();
    }
    name.replace(&format!("-{}", id), "")
        .replace(&format!(" [{}]", id), "")
}
