//! Sequential page-by-page retrieval of activity records.

use crate::{RemoteActivity, StravaClient, StravaError};

/// Fetch every activity in `[after, before)` by walking pages of size
/// `per_page`, starting at page index 0.
///
/// Pages are requested strictly sequentially. The first page whose record
/// count is less than `per_page` (including an empty page) signals the end
/// of data; its records are still included.
///
/// Error policy: any page error aborts the whole fetch. The partial
/// accumulation is discarded and the error propagates to the caller.
pub async fn fetch_all(
    client: &dyn StravaClient,
    after: i64,
    before: i64,
    per_page: u32,
) -> Result<Vec<RemoteActivity>, StravaError> {
    let mut records = Vec::new();
    let mut page = 0u32;
    loop {
        tracing::debug!(page, per_page, "fetching activities page");
        let batch = client.list_activities(after, before, page, per_page).await?;
        let len = batch.len();
        records.extend(batch);
        if len < per_page as usize {
            break;
        }
        page += 1;
    }
    tracing::info!(total = records.len(), pages = page + 1, "fetch complete");
    Ok(records)
}
