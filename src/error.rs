use thiserror::Error;

#[derive(Debug, Error)]
pub enum DlError {
    #[error("{0}")]
    Usage(String),

    #[error("url not supported: {0}")]
    UnsupportedSource(String),

    #[error("malformed format list for {item_id}: {reason}")]
    MalformedFormatList { item_id: String, reason: String },

    #[error("metadata error: {0}")]
    Metadata(String),

    #[error("download fail! {0}")]
    DownloadFailed(String),

    #[error("download daemon rpc error: {0}")]
    Rpc(String),

    #[error("post-processing failed: {0}")]
    PostProcess(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl DlError {
    pub fn missing_url() -> Self {
        DlError::Usage("Error: there's no download url".to_string())
    }

    pub fn malformed(item_id: &str, reason: impl Into<String>) -> Self {
        DlError::MalformedFormatList {
            item_id: item_id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type DlResult<T> = Result<T, DlError>;
