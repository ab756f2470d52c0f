//! Tree listing aggregation.
//!
//! The store lists trees one page at a time. Aggregation reads page 1,
//! learns the page count from the response metadata, fetches the remaining
//! pages concurrently and concatenates everything in ascending page order.
//! Downstream pagination slices the flat list by absolute offset, so page
//! order must hold regardless of request completion order;
//! `try_join_all` writes each result into its input slot and fails the
//! whole aggregation on the first page error.

use futures::future::try_join_all;

use crate::core::{Result, TreeEntry};
use crate::store::RemoteStore;

/// Fetch the entire tree listing under `base_path` as one flat,
/// page-ordered list.
///
/// A missing or unparsable page count in the page 1 response is reported by
/// the store client as 0 total pages and treated here as "no additional
/// pages"; it is a named fallback, not an error. An empty collection yields
/// an empty list with no requests beyond page 1.
pub async fn aggregate_tree(store: &dyn RemoteStore, base_path: &str) -> Result<Vec<TreeEntry>> {
    let first = store.list_tree_page(base_path, 1).await?;
    let total_pages = first.total_pages;

    let mut entries = first.entries;
    if total_pages > 1 {
        let rest = try_join_all(
            (2..=total_pages).map(|page| store.list_tree_page(base_path, page)),
        )
        .await?;
        for page in rest {
            entries.extend(page.entries);
        }
    }

    log::debug!(
        "aggregated {} tree entries under {} across {} page(s)",
        entries.len(),
        base_path,
        total_pages.max(1)
    );
    Ok(entries)
}
