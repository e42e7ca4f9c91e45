use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::platforms::Platform;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadTask {
    pub dir: PathBuf,
    pub out: String,
    pub url: String,
    pub item_id: Option<String>,
}

impl DownloadTask {
    pub fn new(dir: impl Into<PathBuf>, out: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            out: out.into(),
            url: url.into(),
            item_id: None,
        }
    }

    pub fn with_item_id(mut self, id: impl Into<String>) -> Self {
        self.item_id = Some(id.into());
        self
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanEntry {
    /// Separate audio and video streams of one item, muxed after download.
    AvPair {
        item_id: String,
        audio: DownloadTask,
        video: DownloadTask,
    },
    File(DownloadTask),
}

impl PlanEntry {
    pub fn tasks(&self) -> Vec<&DownloadTask> {
        match self {
            PlanEntry::AvPair { audio, video, .. } => vec![audio, video],
            PlanEntry::File(task) => vec![task],
        }
    }
}

#[derive(Debug, Clone)]
pub struct DownloadPlan {
    pub platform: Platform,
    pub entries: Vec<PlanEntry>,
    /// Name the generic platform joins or renames its parts into.
    pub final_name: Option<String>,
}

impl DownloadPlan {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            entries: Vec::new(),
            final_name: None,
        }
    }

    /// Submission order: entries in sequence, audio before video inside a pair.
    pub fn tasks(&self) -> Vec<DownloadTask> {
        self.entries
            .iter()
            .flat_map(|e| e.tasks())
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Active,
    Waiting,
    Paused,
    Error,
    Complete,
    Removed,
}

/// Daemon-side state of a submitted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub gid: String,
    pub status: JobStatus,
    pub completed_length: u64,
}
