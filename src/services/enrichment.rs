use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::collaborators::ImageSearch;
use crate::types::SuggestedItem;

/// Attach the first image search hit to every suggestion.
///
/// All lookups run concurrently and the call returns once each one has
/// finished. A failed or empty lookup leaves that item without an image;
/// order and length of `items` are preserved. Dropping the returned future
/// cancels any lookups still in flight.
pub async fn enrich_with_images(
    search: &dyn ImageSearch,
    items: Vec<SuggestedItem>,
    results_per_item: usize,
) -> Vec<SuggestedItem> {
    let total = items.len();
    let enriched = join_all(
        items
            .into_iter()
            .map(|item| attach_image(search, item, results_per_item)),
    )
    .await;

    let with_image = enriched.iter().filter(|item| item.image_ref.is_some()).count();
    info!(
        target: "itinerary::enrichment",
        total,
        with_image,
        "image enrichment finished"
    );
    enriched
}

async fn attach_image(
    search: &dyn ImageSearch,
    mut item: SuggestedItem,
    results_per_item: usize,
) -> SuggestedItem {
    let query = item.image_query();
    match search.search(&query, results_per_item).await {
        Ok(urls) => match urls.into_iter().next() {
            Some(url) => {
                debug!(target: "itinerary::enrichment", id = %item.id, %url, "image found");
                item.image_ref = Some(url);
            }
            None => {
                debug!(target: "itinerary::enrichment", id = %item.id, %query, "no image results");
                item.image_ref = None;
            }
        },
        Err(err) => {
            warn!(
                target: "itinerary::enrichment",
                id = %item.id,
                %query,
                error = %err,
                "image lookup failed"
            );
            item.image_ref = None;
        }
    }
    item
}
