//! Gallery provider implementations.
//!
//! Each module provides a struct implementing [`crate::provider::DesignProvider`]
//! that scrapes one design-inspiration site.

pub mod brutalist;
pub mod collectui;
pub mod fontsinuse;
pub mod godly;
pub mod httpster;
pub mod landbook;

use std::sync::Arc;

pub use brutalist::BrutalistProvider;
pub use collectui::CollectUiProvider;
pub use fontsinuse::FontsInUseProvider;
pub use godly::GodlyProvider;
pub use httpster::HttpsterProvider;
pub use landbook::LandBookProvider;

use crate::catalog::CategoryDirectory;
use crate::config::SearchConfig;
use crate::provider::DesignProvider;
use crate::types::ProviderKind;

/// Build the provider registry for `config.sources`, in that order.
///
/// All scrapers share `client`; Collect UI shares `directory` with the
/// category operations.
pub fn build_registry(
    config: &SearchConfig,
    client: &reqwest::Client,
    directory: &Arc<CategoryDirectory>,
) -> Vec<Arc<dyn DesignProvider>> {
    config
        .sources
        .iter()
        .map(|kind| -> Arc<dyn DesignProvider> {
            let base = config.base_url(*kind);
            let client = client.clone();
            match kind {
                ProviderKind::CollectUi => Arc::new(CollectUiProvider::new(Arc::clone(directory))),
                ProviderKind::Godly => Arc::new(GodlyProvider::with_base_url(client, base)),
                ProviderKind::LandBook => Arc::new(LandBookProvider::with_base_url(client, base)),
                ProviderKind::Httpster => Arc::new(HttpsterProvider::with_base_url(client, base)),
                ProviderKind::Brutalist => Arc::new(BrutalistProvider::with_base_url(client, base)),
                ProviderKind::FontsInUse => {
                    Arc::new(FontsInUseProvider::with_base_url(client, base))
                }
            }
        })
        .collect()
}
