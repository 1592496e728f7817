//! Paged collection fetcher
//!
//! Walks `page=1,2,…` of a list endpoint until the server-reported page total
//! is reached and accumulates the items in arrival order. A failing page aborts
//! the whole walk: callers never see a partial collection.

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::traits::ErrorContext;

use super::CloudflareProvider;

impl CloudflareProvider {
    /// Fetch every page of `endpoint` with a fixed `page_size`.
    ///
    /// A response without `result_info` is a single-page collection. The walk
    /// also stops on an empty page, whatever the reported total says.
    pub(crate) async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        page_size: u32,
        context: ErrorContext,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let (batch, result_info) = self
                .get_page::<T>(endpoint, page, page_size, context.clone())
                .await?;
            let batch_len = batch.len();
            items.extend(batch);

            let total_pages = result_info.map_or(1, |info| info.page_total());
            log::debug!(
                "{endpoint}: page {page}/{total_pages} ({batch_len} items, {} so far)",
                items.len()
            );

            if page >= total_pages || batch_len == 0 {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}
