//! Collect UI category directory with an in-memory TTL cache.
//!
//! The directory is the one piece of cross-request state in the crate. It
//! is refetched and replaced wholesale when older than the TTL; it is never
//! merged. The clock is injected through [`Clock`] so expiry can be driven
//! deterministically in tests with [`ManualClock`].

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};

use regex::Regex;
use scraper::Html;
use url::Url;

use crate::error::SearchError;
use crate::http::fetch_html;
use crate::scrape::{attr, closest, element_text, resolve_href, selector};
use crate::types::{Category, DesignRecord, ProviderKind, SortOrder};

/// Source of the current instant for cache-age checks.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Wall-clock [`Clock`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A [`Clock`] that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut offset = self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        *offset += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = *self.offset.lock().unwrap_or_else(PoisonError::into_inner);
        self.start + offset
    }
}

#[derive(Debug, Clone)]
struct CachedCategories {
    categories: Arc<Vec<Category>>,
    fetched_at: Instant,
}

/// The Collect UI challenge directory.
///
/// Owns the category cache and serves live category listings. Shared
/// between the Collect UI provider and the query surface via `Arc`.
pub struct CategoryDirectory {
    client: reqwest::Client,
    base_url: String,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    cache: RwLock<Option<CachedCategories>>,
    refresh: tokio::sync::Mutex<()>,
}

impl CategoryDirectory {
    /// Create a directory against the production Collect UI site.
    pub fn new(client: reqwest::Client, ttl: Duration) -> Self {
        Self::with_base_url(client, ProviderKind::CollectUi.default_base_url(), ttl)
    }

    /// Create a directory against an alternative base URL.
    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            ttl,
            clock: Arc::new(SystemClock),
            cache: RwLock::new(None),
            refresh: tokio::sync::Mutex::new(()),
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Base URL this directory fetches from.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List all categories, served from cache while it is fresh.
    ///
    /// Within the TTL every caller receives the same `Arc`. Once the cache
    /// is missing, empty or expired, the homepage is refetched and the list
    /// replaced. Concurrent refreshes are collapsed into one fetch.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when a refresh fails. A stale list is not
    /// served in that case.
    pub async fn list_categories(&self) -> Result<Arc<Vec<Category>>, SearchError> {
        if let Some(hit) = self.fresh() {
            return Ok(hit);
        }

        let _refresh = self.refresh.lock().await;
        if let Some(hit) = self.fresh() {
            return Ok(hit);
        }

        let fetched_at = self.clock.now();
        let html = fetch_html(&self.client, &self.base_url).await?;
        let categories = Arc::new(parse_categories(&html, &self.base_url)?);
        tracing::debug!(count = categories.len(), "category directory refreshed");

        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        *cache = Some(CachedCategories {
            categories: Arc::clone(&categories),
            fetched_at,
        });
        Ok(categories)
    }

    /// Fetch one live listing page for `slug` and parse up to `limit` shots.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] when the page cannot be fetched. A page with
    /// no shots yields an empty list.
    pub async fn browse_category(
        &self,
        slug: &str,
        sort: SortOrder,
        limit: usize,
    ) -> Result<Vec<DesignRecord>, SearchError> {
        let url = category_url(&self.base_url, slug, sort)?;
        let html = fetch_html(&self.client, &url).await?;
        parse_designs(&html, &self.base_url, limit)
    }

    fn fresh(&self) -> Option<Arc<Vec<Category>>> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let cached = cache.as_ref()?;
        let age = self.clock.now().saturating_duration_since(cached.fetched_at);
        (!cached.categories.is_empty() && age < self.ttl).then(|| Arc::clone(&cached.categories))
    }
}

/// `{base}/challenges/{slug}?sortBy=…` with `slug` encoded as one path segment.
fn category_url(base_url: &str, slug: &str, sort: SortOrder) -> Result<String, SearchError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| SearchError::Parse(format!("invalid Collect UI URL: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| SearchError::Parse(format!("Collect UI URL cannot have a path: {base_url}")))?
        .pop_if_empty()
        .push("challenges")
        .push(slug);
    url.query_pairs_mut().append_pair("sortBy", sort.query_value());
    Ok(url.into())
}

/// Lowercase and keep only ASCII letters and digits.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Categories whose normalised name or slug contains the normalised query,
/// or is contained by it.
///
/// Both sides are lowercased and stripped to `[a-z0-9]`, so `dash` finds
/// `dashboard` and `ui-dashboard-design` finds it too.
pub fn match_categories(query: &str, categories: &[Category]) -> Vec<Category> {
    let q = normalize(query);
    categories
        .iter()
        .filter(|category| {
            let name = normalize(&category.name);
            let slug = normalize(&category.slug);
            name.contains(&q) || slug.contains(&q) || q.contains(&name) || q.contains(&slug)
        })
        .cloned()
        .collect()
}

/// Parse the challenge links on the Collect UI homepage.
///
/// Link text of the form `Landing Page (1825)` yields a count. Slugs are
/// unique; the first link for a slug wins.
pub(crate) fn parse_categories(html: &str, base_url: &str) -> Result<Vec<Category>, SearchError> {
    let document = Html::parse_document(html);
    let link_sel = selector(r#"a[href^="/challenges/"]"#)?;
    let counted = Regex::new(r"^(.+?)\s*\((\d+)\)\s*$")
        .map_err(|e| SearchError::Parse(format!("invalid count pattern: {e}")))?;

    let mut categories: Vec<Category> = Vec::new();
    for link in document.select(&link_sel) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let slug = href
            .trim_start_matches("/challenges/")
            .split('?')
            .next()
            .unwrap_or_default();
        if slug.is_empty() || categories.iter().any(|c| c.slug == slug) {
            continue;
        }

        let text = element_text(link);
        let (name, count) = match counted.captures(&text) {
            Some(caps) => (
                caps[1].trim().to_owned(),
                caps[2].parse::<u32>().ok(),
            ),
            None => (text.clone(), None),
        };

        categories.push(Category {
            name,
            slug: slug.to_owned(),
            count,
            url: format!("{base_url}/challenges/{slug}"),
        });
    }

    Ok(categories)
}

/// Parse the design shots on a Collect UI listing page.
pub(crate) fn parse_designs(
    html: &str,
    base_url: &str,
    limit: usize,
) -> Result<Vec<DesignRecord>, SearchError> {
    let document = Html::parse_document(html);
    let shot_sel = selector(r#"img[src*="static.collectui.com/shots"]"#)?;
    let link_sel = selector("a")?;
    let card_sel = selector("div, li, article")?;
    let designer_sel = selector(r#"a[href^="/designers/"]"#)?;
    let category_sel = selector(r#"a[href^="/challenges/"]"#)?;
    let medium = Regex::new(r"-medium(\.\w+)?$")
        .map_err(|e| SearchError::Parse(format!("invalid image pattern: {e}")))?;

    let mut designs = Vec::new();
    for img in document.select(&shot_sel) {
        if designs.len() >= limit {
            break;
        }

        let src = attr(img, "src").unwrap_or_default();
        let large = medium.replace(&src, "-large$1").into_owned();
        let alt = attr(img, "alt");

        let detail_href = closest(img, &link_sel)
            .and_then(|a| attr(a, "href"))
            .unwrap_or_default();

        let card = closest(img, &card_sel);
        let designer = card
            .and_then(|c| c.select(&designer_sel).next())
            .map(element_text)
            .filter(|t| !t.is_empty());
        let category = card
            .and_then(|c| c.select(&category_sel).next())
            .map(element_text)
            .filter(|t| !t.is_empty());

        let title = alt
            .or_else(|| category.clone())
            .unwrap_or_else(|| "Untitled".to_owned());

        let mut record = DesignRecord::new(
            if large.is_empty() { src } else { large },
            title,
            ProviderKind::CollectUi.name(),
            resolve_href(base_url, &detail_href),
        );
        record.designer = designer;
        record.category = category;
        designs.push(record);
    }

    tracing::debug!(count = designs.len(), "Collect UI shots parsed");
    Ok(designs)
}
