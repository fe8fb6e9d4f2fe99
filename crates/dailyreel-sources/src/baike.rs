//! Baidu Baike lookup by scraping an item page's meta description.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use dailyreel_core::Encyclopedia;
use regex::Regex;
use tracing::{debug, warn};

use crate::SourceError;
use crate::http::get_text;

const DEFAULT_BASE_URL: &str = "https://baike.baidu.com/item/";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
// Baike serves a stripped page to non-browser agents.
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
/// Site-wide boilerplate served when the item does not exist.
const SITE_BOILERPLATE: &str = "百度百科是一部内容开放、自由的网络百科全书";

static META_NAME_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\s[^>]*name\s*=\s*["']description["'][^>]*content\s*=\s*"([^"]*)""#)
        .expect("valid regex")
});
static META_CONTENT_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\s[^>]*content\s*=\s*"([^"]*)"[^>]*name\s*=\s*["']description["']"#)
        .expect("valid regex")
});

pub struct BaikeClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl Default for BaikeClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL.to_string())
    }
}

impl BaikeClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn item_url(&self, title: &str) -> String {
        format!("{}{}", self.base_url, urlencoding::encode(title))
    }

    async fn fetch_page(&self, title: &str) -> Result<String, SourceError> {
        let req = self
            .client
            .get(self.item_url(title))
            .timeout(self.timeout)
            .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT);
        get_text(req).await
    }
}

/// The page's meta description, unless it is the site boilerplate.
fn extract_description(html: &str) -> Option<String> {
    let raw = META_NAME_FIRST
        .captures(html)
        .or_else(|| META_CONTENT_FIRST.captures(html))?
        .get(1)?
        .as_str();
    let text = decode_entities(raw.trim());
    if text.is_empty() || text.contains(SITE_BOILERPLATE) {
        return None;
    }
    Some(text)
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[async_trait]
impl Encyclopedia for BaikeClient {
    fn label(&self) -> &str {
        "百度百科"
    }

    async fn summary(&self, query: &str) -> Option<String> {
        match self.fetch_page(query).await {
            Ok(html) => {
                let found = extract_description(&html);
                if found.is_none() {
                    debug!(query, "no baike description on page");
                }
                found
            }
            Err(e) => {
                warn!(query, error = %e, "baike lookup failed");
                None
            }
        }
    }
}
