//! In-memory stand-ins for the external programs and services.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use anyhow::anyhow;
use async_trait::async_trait;

use crate::core::process::{ToolOutput, ToolRunner};
use crate::core::scheduler::DownloadDaemon;
use crate::core::subtitles::SubtitleSource;
use crate::error::DlResult;
use crate::models::download::{DownloadJob, DownloadTask, JobStatus};

#[derive(Default)]
pub struct FakeRunner {
    responses: Mutex<HashMap<String, ToolOutput>>,
    creates_outputs: Mutex<HashSet<String>>,
    calls: Mutex<Vec<(String, Vec<String>)>>,
    text_inputs: Mutex<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, program: &str, code: i32, stdout: &str) {
        self.respond_with_stderr(program, code, stdout, "");
    }

    pub fn respond_with_stderr(&self, program: &str, code: i32, stdout: &str, stderr: &str) {
        self.responses.lock().unwrap().insert(
            program.to_string(),
            ToolOutput {
                code: Some(code),
                stdout: stdout.as_bytes().to_vec(),
                stderr: stderr.as_bytes().to_vec(),
            },
        );
    }

    /// On success, `program` writes an empty file at its last argument.
    pub fn create_outputs(&self, program: &str) {
        self.creates_outputs
            .lock()
            .unwrap()
            .insert(program.to_string());
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Contents of every `.txt` argument that existed when a call ran.
    pub fn text_inputs(&self) -> Vec<String> {
        self.text_inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String]) -> anyhow::Result<ToolOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));

        for arg in args.iter().filter(|a| a.ends_with(".txt")) {
            if let Ok(text) = std::fs::read_to_string(arg) {
                self.text_inputs.lock().unwrap().push(text);
            }
        }

        let output = self
            .responses
            .lock()
            .unwrap()
            .get(program)
            .cloned()
            .ok_or_else(|| anyhow!("{}: not found", program))?;

        if output.success() && self.creates_outputs.lock().unwrap().contains(program) {
            if let Some(target) = args.last() {
                std::fs::write(Path::new(target), b"")?;
            }
        }

        Ok(output)
    }
}

#[derive(Default)]
struct DaemonState {
    next_gid: u32,
    scripts: HashMap<String, Vec<(JobStatus, u64)>>,
    polls: HashMap<String, usize>,
    added: Vec<DownloadTask>,
    removed: Vec<String>,
    status_queries: Vec<Vec<String>>,
}

impl DaemonState {
    fn assign(&mut self, task: &DownloadTask) -> String {
        self.next_gid += 1;
        self.added.push(task.clone());
        format!("g{}", self.next_gid)
    }

    fn status(&mut self, gid: &str) -> DownloadJob {
        let round = self.polls.entry(gid.to_string()).or_insert(0);
        let (status, completed_length) = match self.scripts.get(gid) {
            Some(steps) if !steps.is_empty() => steps[(*round).min(steps.len() - 1)],
            _ => (JobStatus::Complete, 0),
        };
        *round += 1;
        DownloadJob {
            gid: gid.to_string(),
            status,
            completed_length,
        }
    }
}

/// gids are handed out as `g1`, `g2`, ... across `add_batch` and `add`.
/// A scripted gid walks its steps once per poll and then repeats the last
/// one; unscripted gids report complete.
#[derive(Default)]
pub struct FakeDaemon {
    state: Mutex<DaemonState>,
}

impl FakeDaemon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(&self, gid: &str, steps: &[(JobStatus, u64)]) {
        self.state
            .lock()
            .unwrap()
            .scripts
            .insert(gid.to_string(), steps.to_vec());
    }

    pub fn added(&self) -> Vec<DownloadTask> {
        self.state.lock().unwrap().added.clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.state.lock().unwrap().removed.clone()
    }

    pub fn status_queries(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().status_queries.clone()
    }
}

#[async_trait]
impl DownloadDaemon for FakeDaemon {
    async fn add_batch(&self, tasks: &[DownloadTask]) -> DlResult<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        Ok(tasks.iter().map(|t| state.assign(t)).collect())
    }

    async fn tell_status_batch(&self, gids: &[String]) -> DlResult<Vec<DownloadJob>> {
        let mut state = self.state.lock().unwrap();
        state.status_queries.push(gids.to_vec());
        Ok(gids.iter().map(|g| state.status(g)).collect())
    }

    async fn remove_download_result(&self, gid: &str) -> DlResult<()> {
        self.state.lock().unwrap().removed.push(gid.to_string());
        Ok(())
    }

    async fn add(&self, task: &DownloadTask) -> DlResult<String> {
        Ok(self.state.lock().unwrap().assign(task))
    }
}

pub struct FakeSubtitles {
    text: Option<String>,
    fail: bool,
    requested: Mutex<Vec<String>>,
}

impl FakeSubtitles {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            fail: false,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            fail: true,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubtitleSource for FakeSubtitles {
    async fn fetch(&self, video_id: &str) -> anyhow::Result<Option<String>> {
        self.requested.lock().unwrap().push(video_id.to_string());
        if self.fail {
            return Err(anyhow!("lookup service unreachable"));
        }
        Ok(self.text.clone())
    }
}
