// aria2 JSON-RPC client. Every call goes out as a batch (JSON array) so a
// whole download list is submitted or polled in one round-trip.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::core::http_client;
use crate::core::scheduler::DownloadDaemon;
use crate::error::{DlError, DlResult};
use crate::models::download::{DownloadJob, DownloadTask, JobStatus};
use crate::models::settings::RpcSettings;

const STATUS_KEYS: [&str; 3] = ["gid", "status", "completedLength"];

pub struct Aria2Client {
    http: reqwest::Client,
    endpoint: String,
    secret: Option<String>,
    next_id: AtomicU64,
}

impl Aria2Client {
    pub fn new(settings: &RpcSettings) -> DlResult<Self> {
        let http = http_client::build_local_client(Duration::from_secs(settings.timeout_secs))?;
        Ok(Self {
            http,
            endpoint: settings.url.clone(),
            secret: settings.secret.clone(),
            next_id: AtomicU64::new(1),
        })
    }

    fn request(&self, method: &str, args: Vec<Value>) -> (String, Value) {
        let id = format!("dlv-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        (id.clone(), build_request(&id, method, self.secret.as_deref(), args))
    }

    async fn batch(&self, calls: Vec<(String, Value)>) -> DlResult<Vec<Value>> {
        if calls.is_empty() {
            return Ok(Vec::new());
        }

        let (ids, bodies): (Vec<String>, Vec<Value>) = calls.into_iter().unzip();
        let response = self
            .http
            .post(&self.endpoint)
            .json(&bodies)
            .send()
            .await
            .map_err(|e| DlError::Rpc(format!("{} unreachable: {}", self.endpoint, e)))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| DlError::Rpc(format!("bad response (HTTP {}): {}", status, e)))?;

        parse_batch_response(&ids, body)
    }

    async fn single(&self, method: &str, args: Vec<Value>) -> DlResult<Value> {
        self.batch(vec![self.request(method, args)])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DlError::Rpc(format!("{} returned nothing", method)))
    }
}

fn add_uri_args(task: &DownloadTask) -> Vec<Value> {
    vec![
        json!([task.url]),
        json!({
            "dir": task.dir.to_string_lossy(),
            "out": task.out,
        }),
    ]
}

pub fn build_request(id: &str, method: &str, secret: Option<&str>, args: Vec<Value>) -> Value {
    let mut params = Vec::with_capacity(args.len() + 1);
    if let Some(secret) = secret {
        params.push(Value::String(format!("token:{}", secret)));
    }
    params.extend(args);
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// Results in request order; any per-call error fails the whole batch.
pub fn parse_batch_response(ids: &[String], body: Value) -> DlResult<Vec<Value>> {
    let replies = match body {
        Value::Array(items) => items,
        other => {
            return Err(DlError::Rpc(format!(
                "expected batch reply, got {}",
                rpc_error_message(&other).unwrap_or_else(|| other.to_string())
            )))
        }
    };

    let mut by_id: HashMap<String, Value> = replies
        .into_iter()
        .filter_map(|r| {
            let id = r.get("id")?.as_str()?.to_string();
            Some((id, r))
        })
        .collect();

    ids.iter()
        .map(|id| {
            let mut reply = by_id
                .remove(id)
                .ok_or_else(|| DlError::Rpc(format!("no reply for request {}", id)))?;
            if let Some(msg) = rpc_error_message(&reply) {
                return Err(DlError::Rpc(msg));
            }
            reply
                .get_mut("result")
                .map(Value::take)
                .ok_or_else(|| DlError::Rpc(format!("reply {} has no result", id)))
        })
        .collect()
}

fn rpc_error_message(reply: &Value) -> Option<String> {
    let err = reply.get("error")?;
    let code = err.get("code").and_then(Value::as_i64).unwrap_or(0);
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    Some(format!("[{}] {}", code, message))
}

pub fn parse_gid(result: Value) -> DlResult<String> {
    match result {
        Value::String(gid) => Ok(gid),
        other => Err(DlError::Rpc(format!("expected gid, got {}", other))),
    }
}

pub fn parse_job(result: Value) -> DlResult<DownloadJob> {
    let gid = result
        .get("gid")
        .and_then(Value::as_str)
        .ok_or_else(|| DlError::Rpc("status without gid".into()))?
        .to_string();

    let status: JobStatus = result
        .get("status")
        .cloned()
        .map(serde_json::from_value::<JobStatus>)
        .transpose()?
        .ok_or_else(|| DlError::Rpc(format!("status missing for {}", gid)))?;

    // aria2 encodes numbers as strings
    let completed_length = match result.get("completedLength") {
        Some(Value::String(s)) => s
            .parse::<u64>()
            .map_err(|e| DlError::Rpc(format!("bad completedLength {:?}: {}", s, e)))?,
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        _ => 0,
    };

    Ok(DownloadJob {
        gid,
        status,
        completed_length,
    })
}

#[async_trait]
impl DownloadDaemon for Aria2Client {
    async fn add_batch(&self, tasks: &[DownloadTask]) -> DlResult<Vec<String>> {
        let calls = tasks
            .iter()
            .map(|t| self.request("aria2.addUri", add_uri_args(t)))
            .collect();
        self.batch(calls).await?.into_iter().map(parse_gid).collect()
    }

    async fn tell_status_batch(&self, gids: &[String]) -> DlResult<Vec<DownloadJob>> {
        let calls = gids
            .iter()
            .map(|gid| self.request("aria2.tellStatus", vec![json!(gid), json!(STATUS_KEYS)]))
            .collect();
        self.batch(calls).await?.into_iter().map(parse_job).collect()
    }

    async fn remove_download_result(&self, gid: &str) -> DlResult<()> {
        self.single("aria2.removeDownloadResult", vec![json!(gid)])
            .await
            .map(|_| ())
    }

    async fn add(&self, task: &DownloadTask) -> DlResult<String> {
        parse_gid(self.single("aria2.addUri", add_uri_args(task)).await?)
    }
}
