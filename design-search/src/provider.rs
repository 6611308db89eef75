//! Trait definition for pluggable gallery providers.
//!
//! Each gallery (Collect UI, Godly, Land-book, Httpster, Brutalist
//! Websites, Fonts In Use) implements [`DesignProvider`] to provide a
//! uniform search interface to the orchestrator.

use async_trait::async_trait;

use crate::error::SearchError;
use crate::types::DesignRecord;

/// A gallery scraper.
///
/// Implementors fetch one site's HTML and extract [`DesignRecord`] values.
/// Each provider handles its own:
///
/// - URL construction (native search or a fixed listing page)
/// - HTML parsing via CSS selectors
/// - Local keyword filtering when the site has no search
/// - De-duplication by image URL
///
/// Contract:
///
/// - Return at most `limit` records; fewer is always acceptable.
/// - "Nothing found" is `Ok(vec![])`, never an error.
/// - Errors are reserved for transport faults (network, non-2xx, timeout).
///
/// Providers are stored as `Arc<dyn DesignProvider>` in an ordered registry,
/// so implementations must be `Send + Sync`.
#[async_trait]
pub trait DesignProvider: Send + Sync {
    /// Human-readable name, stamped on records as `source`.
    fn name(&self) -> &str;

    /// Machine identifier used for source filtering.
    fn slug(&self) -> &str;

    /// Search this gallery.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] only for transport-level failures.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<DesignRecord>, SearchError>;
}
