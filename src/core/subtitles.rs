use anyhow::anyhow;
use async_trait::async_trait;
use scraper::{Html, Selector};

#[async_trait]
pub trait SubtitleSource: Send + Sync {
    /// Subtitle text for a video id, `None` when the service has none.
    async fn fetch(&self, video_id: &str) -> anyhow::Result<Option<String>>;
}

/// Scrapes a keepvid-style page: `?url=<watch url>&mode=subs` with the link under `div#dl`.
pub struct KeepVidLookup {
    client: reqwest::Client,
    base: String,
}

impl KeepVidLookup {
    pub fn new(client: reqwest::Client, base: &str) -> Self {
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn lookup_url(&self, video_id: &str) -> String {
        let watch = format!("http://youtube.com/watch?v={}", video_id);
        let encoded: String = url::form_urlencoded::byte_serialize(watch.as_bytes()).collect();
        format!("{}/?url={}&mode=subs", self.base, encoded)
    }
}

pub fn extract_download_link(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let sel = Selector::parse("div#dl > a").ok()?;
    doc.select(&sel)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| href.to_string())
}

#[async_trait]
impl SubtitleSource for KeepVidLookup {
    async fn fetch(&self, video_id: &str) -> anyhow::Result<Option<String>> {
        let page_url = self.lookup_url(video_id);
        tracing::debug!("subtitle lookup: {}", page_url);

        let page = self.client.get(&page_url).send().await?;
        if !page.status().is_success() {
            return Err(anyhow!("subtitle page returned HTTP {}", page.status()));
        }
        let html = page.text().await?;

        let Some(href) = extract_download_link(&html) else {
            return Ok(None);
        };

        let body = self.client.get(&href).send().await?;
        if !body.status().is_success() {
            return Err(anyhow!("subtitle download returned HTTP {}", body.status()));
        }
        Ok(Some(body.text().await?))
    }
}
