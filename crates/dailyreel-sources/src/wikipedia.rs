//! Wikipedia lookup through the MediaWiki action API.
//!
//! Search is full-text, so the best hit may be a disambiguation page. In that
//! case the first article linked in the page's wikitext is taken. The
//! `prop=links` list is sorted by title, so it cannot give page order.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use dailyreel_core::Encyclopedia;
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::SourceError;
use crate::http::{USER_AGENT, get_json};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
const SEARCH_LIMIT: &str = "5";

/// `[[Target]]`, `[[Target|label]]` or `[[Target#section|label]]`.
static WIKILINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]|#]+)(?:[#|][^\]]*)?\]\]").expect("valid regex"));

pub struct WikipediaClient {
    client: reqwest::Client,
    api_url: String,
    variant: Option<String>,
    label: String,
    timeout: Duration,
}

impl WikipediaClient {
    /// Client for `https://{language}.wikipedia.org`.
    ///
    /// `variant` selects a script variant where the wiki has one (e.g. `zh-cn`).
    pub fn new(language: &str, variant: Option<String>) -> Self {
        let label = if language.starts_with("zh") {
            "维基百科".to_string()
        } else {
            "Wikipedia".to_string()
        };
        Self::with_api_url(
            format!("https://{language}.wikipedia.org/w/api.php"),
            variant,
            label,
        )
    }

    pub fn with_api_url(api_url: String, variant: Option<String>, label: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            variant: variant.filter(|v| !v.trim().is_empty()),
            label,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<T, SourceError> {
        let mut req = self
            .client
            .get(&self.api_url)
            .timeout(self.timeout)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .query(&[
                ("action", action),
                ("format", "json"),
                ("formatversion", "2"),
                ("utf8", "1"),
            ])
            .query(params);
        if let Some(variant) = &self.variant {
            req = req.query(&[("variant", variant.as_str())]);
        }
        get_json(req).await
    }

    /// Titles of the best full-text matches, best first.
    async fn search(&self, text: &str) -> Result<Vec<String>, SourceError> {
        let resp: QueryResponse = self
            .call(
                "query",
                &[("list", "search"), ("srsearch", text), ("srlimit", SEARCH_LIMIT)],
            )
            .await?;
        Ok(resp.query.search.into_iter().map(|h| h.title).collect())
    }

    /// Intro extract and disambiguation flag of one page.
    async fn page(&self, title: &str) -> Result<Option<Page>, SourceError> {
        let resp: QueryResponse = self
            .call(
                "query",
                &[
                    ("titles", title),
                    ("prop", "extracts|pageprops"),
                    ("exintro", "1"),
                    ("explaintext", "1"),
                    ("redirects", "1"),
                    ("ppprop", "disambiguation"),
                ],
            )
            .await?;
        Ok(resp.query.pages.into_iter().find(|p| !p.missing))
    }

    /// First article linked from `title`, in page order.
    async fn first_listed_article(&self, title: &str) -> Result<Option<String>, SourceError> {
        let resp: ParseResponse = self
            .call(
                "parse",
                &[("page", title), ("prop", "wikitext"), ("redirects", "1")],
            )
            .await?;
        Ok(resp.parse.and_then(|p| first_article_link(&p.wikitext)))
    }

    async fn lookup(&self, text: &str) -> Result<Option<String>, SourceError> {
        let Some(title) = self.search(text).await?.into_iter().next() else {
            debug!(query = text, "no wikipedia search hits");
            return Ok(None);
        };

        let Some(page) = self.page(&title).await? else {
            return Ok(None);
        };
        match classify(page) {
            PageOutcome::Summary(summary) => Ok(Some(summary)),
            PageOutcome::Nothing => Ok(None),
            PageOutcome::Disambiguation => {
                let Some(next) = self.first_listed_article(&title).await? else {
                    debug!(page = %title, "disambiguation page lists no article");
                    return Ok(None);
                };
                debug!(from = %title, to = %next, "disambiguation page, following first link");
                match self.page(&next).await? {
                    Some(page) if !page.is_disambiguation() => Ok(non_empty(page.extract)),
                    _ => Ok(None),
                }
            }
        }
    }
}

// ── Payloads ──

#[derive(Debug, Default, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: QueryBody,
}

#[derive(Debug, Default, Deserialize)]
struct QueryBody {
    #[serde(default)]
    search: Vec<SearchHit>,
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct Page {
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    #[serde(default)]
    disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    #[serde(default)]
    parse: Option<ParseBody>,
}

#[derive(Debug, Deserialize)]
struct ParseBody {
    #[serde(default)]
    wikitext: String,
}

impl Page {
    fn is_disambiguation(&self) -> bool {
        self.pageprops
            .as_ref()
            .is_some_and(|p| p.disambiguation.is_some())
    }
}

#[derive(Debug, PartialEq)]
enum PageOutcome {
    Summary(String),
    Disambiguation,
    Nothing,
}

fn classify(page: Page) -> PageOutcome {
    if page.is_disambiguation() {
        return PageOutcome::Disambiguation;
    }
    match non_empty(page.extract) {
        Some(text) => PageOutcome::Summary(text),
        None => PageOutcome::Nothing,
    }
}

/// First main-namespace link target in `wikitext`. File, category and
/// interwiki links carry a `:` prefix and are skipped.
fn first_article_link(wikitext: &str) -> Option<String> {
    WIKILINK
        .captures_iter(wikitext)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().replace('_', " "))
        .find(|target| !target.is_empty() && !target.contains(':'))
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    fn label(&self) -> &str {
        &self.label
    }

    async fn summary(&self, query: &str) -> Option<String> {
        match self.lookup(query).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(query, error = %e, "wikipedia lookup failed");
                None
            }
        }
    }
}
