pub mod client;
pub mod endpoints;
pub mod models;

pub use client::{ApiCall, RestClient};
pub use models::{CategoryFilter, LinkRecord, LinkUpdate, NewLink, category_tabs};

use crate::error::StartPageError;
use std::future::Future;

/// Source of quick links and their categories.
///
/// `RestClient` is the production implementation; anything that can hand back
/// an ordered snapshot of links can drive the paginator.
pub trait LinkProvider {
    /// Links in backend order. `CategoryFilter::All` returns the unfiltered set.
    fn load_links(
        &self,
        filter: &CategoryFilter,
    ) -> impl Future<Output = Result<Vec<LinkRecord>, StartPageError>> + Send;

    /// Distinct category names, order not significant.
    fn load_categories(&self) -> impl Future<Output = Result<Vec<String>, StartPageError>> + Send;
}
