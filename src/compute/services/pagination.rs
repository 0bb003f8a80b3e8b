//! Draining paginated provider listings.

use crate::compute::ports::{Page, ProviderError, ProviderErrorKind, ProviderResult};
use std::collections::HashSet;
use std::future::Future;
use tracing::debug;

/// Follows page tokens until the provider reports the last page.
///
/// Items are returned in provider order. A token that was already sent, in
/// the last request or any earlier one, is reported as an error instead of
/// being followed.
///
/// # Errors
///
/// Returns the first provider error; no partial results are returned.
pub async fn drain_pages<T, F, Fut>(mut fetch: F) -> ProviderResult<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = ProviderResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    let mut sent: HashSet<String> = HashSet::new();
    let mut pages: usize = 0;

    loop {
        let page = fetch(token.clone()).await?;
        pages += 1;
        items.extend(page.items);

        match page.next_page.filter(|next| !next.is_empty()) {
            None => break,
            Some(next) if !sent.insert(next.clone()) => {
                return Err(ProviderError::new(
                    ProviderErrorKind::Internal,
                    "PaginationStalled",
                    format!("pagination token '{next}' did not advance after {pages} pages"),
                ));
            }
            Some(next) => token = Some(next),
        }
    }

    debug!(pages, items = items.len(), "drained paginated listing");
    Ok(items)
}
