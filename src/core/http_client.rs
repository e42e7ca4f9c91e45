use std::time::Duration;

use crate::models::settings::ProxySettings;

const USER_AGENT: &str = concat!("dl-video/", env!("CARGO_PKG_VERSION"));

pub fn proxy_url(proxy: &ProxySettings) -> Option<String> {
    if !proxy.enabled || proxy.host.is_empty() {
        return None;
    }
    let scheme = match proxy.proxy_type.as_str() {
        "socks5" => "socks5",
        "https" => "https",
        _ => "http",
    };
    if !proxy.username.is_empty() {
        Some(format!(
            "{}://{}:{}@{}:{}",
            scheme, proxy.username, proxy.password, proxy.host, proxy.port
        ))
    } else {
        Some(format!("{}://{}:{}", scheme, proxy.host, proxy.port))
    }
}

pub fn apply_proxy(
    builder: reqwest::ClientBuilder,
    proxy: &ProxySettings,
) -> reqwest::ClientBuilder {
    let Some(url) = proxy_url(proxy) else {
        return builder;
    };
    match reqwest::Proxy::all(&url) {
        Ok(p) => builder.proxy(p),
        Err(e) => {
            tracing::warn!("Invalid proxy URL: {}", e);
            builder
        }
    }
}

/// Client for third-party sites; honours the configured proxy.
pub fn build_client(proxy: &ProxySettings, timeout: Duration) -> reqwest::Result<reqwest::Client> {
    apply_proxy(
        reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout),
        proxy,
    )
    .build()
}

/// Client for the local download daemon; never proxied.
pub fn build_local_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .no_proxy()
        .build()
}
