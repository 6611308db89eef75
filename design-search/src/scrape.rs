//! HTML helpers shared by the gallery scrapers.

use std::collections::HashSet;

use scraper::{ElementRef, Selector};

use crate::error::SearchError;
use crate::types::DesignRecord;

/// Titles lifted from free page text are cut to this many characters.
pub(crate) const MAX_TITLE_CHARS: usize = 100;

/// Compile a CSS selector, mapping failures to [`SearchError::Parse`].
pub(crate) fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector `{css}`: {e:?}")))
}

/// Resolve a link against `base`.
///
/// Absolute links pass through, root-relative links are joined to `base`,
/// anything else resolves to `""`.
pub(crate) fn resolve_href(base: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_owned()
    } else if href.starts_with('/') {
        format!("{base}{href}")
    } else {
        String::new()
    }
}

/// Make an image `src` absolute: protocol-relative sources get `https:`,
/// root-relative and bare relative sources are joined to `base`.
pub(crate) fn absolute_src(base: &str, src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else if src.starts_with("http") {
        src.to_owned()
    } else if src.starts_with('/') {
        format!("{base}{src}")
    } else {
        format!("{base}/{src}")
    }
}

/// Nearest element, starting at `element` itself, that matches `sel`.
pub(crate) fn closest<'a>(element: ElementRef<'a>, sel: &Selector) -> Option<ElementRef<'a>> {
    if sel.matches(&element) {
        return Some(element);
    }
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| sel.matches(ancestor))
}

/// Trimmed text of the first `sel` match under `scope`, if non-empty.
pub(crate) fn first_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    let text = element_text(scope.select(sel).next()?);
    (!text.is_empty()).then_some(text)
}

/// Trimmed text content of an element.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

/// Non-empty attribute value.
pub(crate) fn attr(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Declared `width` attribute, reading leading digits only (`"120px"` → 120).
/// Missing or non-numeric widths read as 0.
pub(crate) fn declared_width(element: ElementRef<'_>) -> u32 {
    element
        .value()
        .attr("width")
        .map(|raw| {
            raw.trim()
                .chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>()
        })
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

/// Cut `text` to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Accumulates records up to a cap, dropping repeats of the same image URL.
#[derive(Debug)]
pub(crate) struct RecordCollector {
    records: Vec<DesignRecord>,
    seen: HashSet<String>,
    cap: usize,
}

impl RecordCollector {
    pub(crate) fn new(cap: usize) -> Self {
        Self {
            records: Vec::new(),
            seen: HashSet::new(),
            cap,
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.records.len() >= self.cap
    }

    /// Add `record` unless the collector is full or already holds its image.
    /// Returns whether the record was kept.
    pub(crate) fn push(&mut self, record: DesignRecord) -> bool {
        if self.is_full() || !self.seen.insert(record.image_url.clone()) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub(crate) fn into_records(self) -> Vec<DesignRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn resolve_absolute_relative_and_unknown() {
        let base = "https://httpster.net";
        assert_eq!(resolve_href(base, "https://a.com/x"), "https://a.com/x");
        assert_eq!(resolve_href(base, "/website/x"), "https://httpster.net/website/x");
        assert_eq!(resolve_href(base, "website/x"), "");
        assert_eq!(resolve_href(base, ""), "");
    }

    #[test]
    fn absolute_src_variants() {
        let base = "https://brutalistwebsites.com";
        assert_eq!(absolute_src(base, "//cdn.x/a.png"), "https://cdn.x/a.png");
        assert_eq!(absolute_src(base, "https://cdn.x/a.png"), "https://cdn.x/a.png");
        assert_eq!(absolute_src(base, "/_img/a.jpg"), "https://brutalistwebsites.com/_img/a.jpg");
        assert_eq!(absolute_src(base, "_img/a.jpg"), "https://brutalistwebsites.com/_img/a.jpg");
    }

    #[test]
    fn closest_walks_up_to_matching_ancestor() {
        let html = Html::parse_fragment(
            r#"<article><a href="/d/1"><span><img src="a.png"></span></a></article>"#,
        );
        let img_sel = selector("img").expect("selector");
        let a_sel = selector("a").expect("selector");
        let card_sel = selector("div, li, article").expect("selector");
        let img = html.select(&img_sel).next().expect("img");

        let link = closest(img, &a_sel).expect("anchor ancestor");
        assert_eq!(link.value().attr("href"), Some("/d/1"));
        let card = closest(img, &card_sel).expect("card ancestor");
        assert_eq!(card.value().name(), "article");
    }

    #[test]
    fn closest_returns_none_without_match() {
        let html = Html::parse_fragment(r#"<p><img src="a.png"></p>"#);
        let img_sel = selector("img").expect("selector");
        let a_sel = selector("a").expect("selector");
        let img = html.select(&img_sel).next().expect("img");
        assert!(closest(img, &a_sel).is_none());
    }

    #[test]
    fn first_text_uses_first_match_only() {
        let html = Html::parse_fragment(r#"<div><h2>  </h2><h3>Later</h3></div>"#);
        let div_sel = selector("div").expect("selector");
        let title_sel = selector("h2, h3").expect("selector");
        let div = html.select(&div_sel).next().expect("div");
        assert_eq!(first_text(div, &title_sel), None);
    }

    #[test]
    fn declared_width_reads_leading_digits() {
        let html = Html::parse_fragment(
            r#"<img id="a" width="120px"><img id="b" width="wide"><img id="c">"#,
        );
        let widths: Vec<u32> = html
            .select(&selector("img").expect("selector"))
            .map(declared_width)
            .collect();
        assert_eq!(widths, vec![120, 0, 0]);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn collector_dedups_and_caps() {
        let mut collector = RecordCollector::new(2);
        assert!(collector.push(DesignRecord::new("a", "A", "Godly", "")));
        assert!(!collector.push(DesignRecord::new("a", "A again", "Godly", "")));
        assert!(collector.push(DesignRecord::new("b", "B", "Godly", "")));
        assert!(collector.is_full());
        assert!(!collector.push(DesignRecord::new("c", "C", "Godly", "")));
        let records = collector.into_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].title, "B");
    }

    #[test]
    fn invalid_selector_is_parse_error() {
        let err = selector("img[").unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }
}
