use crate::platforms::generic_ytdlp::GenericYtdlpSource;
use crate::platforms::ted::TedSource;
use crate::platforms::traits::DownloadSource;
use crate::platforms::youtube::YouTubeSource;

pub struct SourceRegistry {
    sources: Vec<Box<dyn DownloadSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(YouTubeSource::new()));
        registry.register(Box::new(TedSource::new()));
        // Generic fallback must stay last so specific sources take priority
        registry.register(Box::new(GenericYtdlpSource::new()));
        registry
    }

    pub fn register(&mut self, source: Box<dyn DownloadSource>) {
        self.sources.push(source);
    }

    pub fn find_source(&self, url: &str) -> Option<&dyn DownloadSource> {
        self.sources
            .iter()
            .find(|s| s.can_handle(url))
            .map(|s| s.as_ref())
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
