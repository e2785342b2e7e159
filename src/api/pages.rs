//! Page-walking for paginated catalog listings.

use super::types::Page;
use crate::error::Result;
use std::future::Future;

/// Walk a paginated listing and concatenate the pages in order.
///
/// Page 0 comes first, then page numbers increase while they do not exceed
/// `last_page`, re-read from every response. Page 1 is always requested,
/// so a listing reporting `last_page == 0` still costs two requests.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page = 0;
    let mut bound = 1;

    while page <= bound {
        let response = fetch_page(page).await?;
        page += 1;
        items.extend(response.data);
        bound = response.meta.last_page.max(1);
    }

    Ok(items)
}
