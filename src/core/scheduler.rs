use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::{DlError, DlResult};
use crate::models::download::{DownloadJob, DownloadTask, JobStatus};

/// The download manager the scheduler hands tasks to.
#[async_trait]
pub trait DownloadDaemon: Send + Sync {
    /// One gid per task, in task order.
    async fn add_batch(&self, tasks: &[DownloadTask]) -> DlResult<Vec<String>>;
    /// One job per gid, in gid order.
    async fn tell_status_batch(&self, gids: &[String]) -> DlResult<Vec<DownloadJob>>;
    async fn remove_download_result(&self, gid: &str) -> DlResult<()>;
    async fn add(&self, task: &DownloadTask) -> DlResult<String>;
}

#[derive(Debug, Clone)]
struct Slot {
    gid: String,
    complete: bool,
    retries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerReport {
    /// Final gid of every task, aligned with the submitted list.
    pub gids: Vec<String>,
    pub retries: Vec<u32>,
    pub rounds: u32,
}

enum RoundOutcome {
    Continue,
    Finished,
    Failed(String),
}

pub struct Scheduler<'a> {
    daemon: &'a dyn DownloadDaemon,
    poll_interval: Duration,
    max_retries: u32,
}

impl<'a> Scheduler<'a> {
    pub fn new(daemon: &'a dyn DownloadDaemon) -> Self {
        Self {
            daemon,
            poll_interval: Duration::from_secs(3),
            max_retries: 3,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Resubmissions allowed per task before a partial failure becomes fatal.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub async fn run(&self, tasks: &[DownloadTask]) -> DlResult<SchedulerReport> {
        for task in tasks {
            info!("downloading: {} <- {}", task.out, task.url);
        }

        let gids = self.daemon.add_batch(tasks).await?;
        if gids.len() != tasks.len() {
            return Err(DlError::Rpc(format!(
                "submitted {} tasks but got {} gids",
                tasks.len(),
                gids.len()
            )));
        }

        let mut slots: Vec<Slot> = gids
            .into_iter()
            .map(|gid| Slot {
                gid,
                complete: false,
                retries: 0,
            })
            .collect();

        info!("waiting for download finish......");
        let mut rounds = 0;
        loop {
            rounds += 1;
            match self.poll_round(tasks, &mut slots).await? {
                RoundOutcome::Finished => break,
                RoundOutcome::Failed(out) => return Err(DlError::DownloadFailed(out)),
                RoundOutcome::Continue => tokio::time::sleep(self.poll_interval).await,
            }
        }

        info!("congratulation: download finish!");
        Ok(SchedulerReport {
            retries: slots.iter().map(|s| s.retries).collect(),
            gids: slots.into_iter().map(|s| s.gid).collect(),
            rounds,
        })
    }

    async fn poll_round(&self, tasks: &[DownloadTask], slots: &mut [Slot]) -> DlResult<RoundOutcome> {
        let tracked: Vec<usize> = slots
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.complete)
            .map(|(i, _)| i)
            .collect();

        if tracked.is_empty() {
            return Ok(RoundOutcome::Finished);
        }

        let gids: Vec<String> = tracked.iter().map(|&i| slots[i].gid.clone()).collect();
        let jobs = self.daemon.tell_status_batch(&gids).await?;
        if jobs.len() != tracked.len() {
            return Err(DlError::Rpc(format!(
                "asked for {} statuses but got {}",
                tracked.len(),
                jobs.len()
            )));
        }

        let mut completed_bytes = 0u64;
        for (&idx, job) in tracked.iter().zip(jobs) {
            let task = &tasks[idx];
            completed_bytes += job.completed_length;

            match job.status {
                JobStatus::Error if job.completed_length == 0 => {
                    warn!("{} failed before receiving any data", task.out);
                    return Ok(RoundOutcome::Failed(task.out.clone()));
                }
                JobStatus::Removed => {
                    warn!("{} was removed from the daemon", task.out);
                    return Ok(RoundOutcome::Failed(task.out.clone()));
                }
                JobStatus::Error => {
                    let slot = &mut slots[idx];
                    if slot.retries >= self.max_retries {
                        warn!("{} kept failing after {} retries", task.out, slot.retries);
                        return Ok(RoundOutcome::Failed(task.out.clone()));
                    }

                    warn!(
                        "download again: {} (stopped at {} bytes)",
                        task.out, job.completed_length
                    );
                    self.daemon.remove_download_result(&job.gid).await?;
                    slot.gid = self.daemon.add(task).await?;
                    slot.retries += 1;
                }
                JobStatus::Complete => {
                    info!("finished: {}", task.out);
                    slots[idx].complete = true;
                }
                JobStatus::Active | JobStatus::Waiting | JobStatus::Paused => {}
            }
        }

        let done = slots.iter().filter(|s| s.complete).count();
        tracing::debug!("{}/{} complete, {} bytes in flight", done, slots.len(), completed_bytes);

        if done == slots.len() {
            Ok(RoundOutcome::Finished)
        } else {
            Ok(RoundOutcome::Continue)
        }
    }
}
