use std::future::Future;

use crate::{Res, types::Page};

/// Collects the items of every page into one vector, in API order.
///
/// `fetch` is called with `None` for the first page and with the previous
/// page's `next` URL afterwards. The loop stops at the first page without a
/// `next` URL, so exactly as many pages are requested as exist. Any error
/// aborts the drain.
pub async fn drain<T, F, Fut>(mut fetch: F) -> Res<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Res<Page<T>>>,
{
    let mut items = Vec::new();
    let mut cursor = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(cursor.take()).await?;
        pages += 1;
        items.extend(page.items);

        match page.next {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    log::debug!("drained {} page(s), {} item(s)", pages, items.len());
    Ok(items)
}
