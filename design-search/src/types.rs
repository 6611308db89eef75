//! Core types for design records, categories, and provider identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single design example discovered on a gallery site.
///
/// Serialised in camelCase (`imageUrl`, `sourceUrl`) so the wire shape is
/// stable for callers. Optional provider-specific fields are omitted when
/// absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRecord {
    /// Absolute URL of the preview image.
    pub image_url: String,
    /// Human-readable label. Never empty; providers fall back to alt text
    /// or a provider-specific default.
    pub title: String,
    /// Display name of the provider that produced this record.
    pub source: String,
    /// Absolute URL of the detail page or original site, or `""` when unknown.
    pub source_url: String,
    /// Designer credit, when the gallery exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designer: Option<String>,
    /// Gallery category label, when the gallery exposes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl DesignRecord {
    /// Build a record with the four common fields and no optional extras.
    pub fn new(
        image_url: impl Into<String>,
        title: impl Into<String>,
        source: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            image_url: image_url.into(),
            title: title.into(),
            source: source.into(),
            source_url: source_url.into(),
            designer: None,
            category: None,
        }
    }

    /// Whether this record may be delivered to callers: it needs an image
    /// and an attributed source.
    pub fn is_valid(&self) -> bool {
        !self.image_url.trim().is_empty() && !self.source.trim().is_empty()
    }
}

/// A named, counted grouping from the Collect UI challenge directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display name, e.g. `Landing Page`.
    pub name: String,
    /// URL-safe identifier, unique within one directory listing.
    pub slug: String,
    /// Total known designs, `None` when the label carried no count.
    pub count: Option<u32>,
    /// Canonical absolute link to the category page.
    pub url: String,
}

/// Listing order for a category page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most-liked designs first.
    #[default]
    Popular,
    /// Most recently added designs first.
    Newest,
}

impl SortOrder {
    /// Wire name used by callers (`popular` / `newest`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::Newest => "newest",
        }
    }

    /// Value of the upstream `sortBy` query parameter.
    pub fn query_value(self) -> &'static str {
        match self {
            Self::Popular => "popularity",
            Self::Newest => "newest",
        }
    }

    /// Parse a caller-supplied sort name, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "popular" => Some(Self::Popular),
            "newest" => Some(Self::Newest),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The built-in gallery providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Collect UI: curated daily-UI challenge shots, grouped by category.
    CollectUi,
    /// Godly: hand-picked web design, no native search.
    Godly,
    /// Land-book: landing page gallery with native search.
    LandBook,
    /// Httpster: website showcase, no native search.
    Httpster,
    /// Brutalist Websites: raw, unpolished sites, no native search.
    Brutalist,
    /// Fonts In Use: typography in the wild, with native search.
    FontsInUse,
}

impl ProviderKind {
    /// Human-readable name, stamped on every record as `source`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CollectUi => "Collect UI",
            Self::Godly => "Godly",
            Self::LandBook => "Land-book",
            Self::Httpster => "Httpster",
            Self::Brutalist => "Brutalist Websites",
            Self::FontsInUse => "Fonts In Use",
        }
    }

    /// Machine identifier used for source filtering.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::CollectUi => "collectui",
            Self::Godly => "godly",
            Self::LandBook => "landbook",
            Self::Httpster => "httpster",
            Self::Brutalist => "brutalist",
            Self::FontsInUse => "fontsinuse",
        }
    }

    /// Production base URL of the gallery site (no trailing slash).
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::CollectUi => "https://collectui.com",
            Self::Godly => "https://godly.website",
            Self::LandBook => "https://land-book.com",
            Self::Httpster => "https://httpster.net",
            Self::Brutalist => "https://brutalistwebsites.com",
            Self::FontsInUse => "https://fontsinuse.com",
        }
    }

    /// All providers in registry order. Merge order follows this order.
    pub fn all() -> &'static [ProviderKind] {
        &[
            Self::CollectUi,
            Self::Godly,
            Self::LandBook,
            Self::Httpster,
            Self::Brutalist,
            Self::FontsInUse,
        ]
    }

    /// Look up a provider by slug.
    pub fn parse(slug: &str) -> Option<Self> {
        let slug = slug.trim();
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.slug().eq_ignore_ascii_case(slug))
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a multi-provider search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    /// Interleaved records, at most the requested limit.
    pub designs: Vec<DesignRecord>,
    /// Distinct source names across every collected candidate, in the
    /// order they were first seen. Computed before truncation.
    pub sources_used: Vec<String>,
}

impl SearchOutcome {
    /// Whether no provider contributed anything.
    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }
}
