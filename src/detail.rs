//! Detail record retrieval.

use crate::config::RetryPolicy;
use crate::constants::{DETAIL_EXTENSION, DETAILS_DIR};
use crate::error::{LookupError, Result};
use crate::models::DetailRecord;
use crate::source::{ResourceSource, fetch_json};
use tracing::debug;

/// Relative location of the detail record for `id`.
///
/// Identifiers come from the index, but they end up in a path or URL, so
/// anything that could step outside the details directory is refused.
pub fn detail_location(id: &str) -> Result<String> {
    if id.trim().is_empty() {
        return Err(LookupError::invalid_identifier(id, "identifier is empty"));
    }
    if id.contains(['/', '\\', '?', '#']) || id == "." || id == ".." {
        return Err(LookupError::invalid_identifier(
            id,
            "identifier contains path or URL syntax",
        ));
    }
    if id.chars().any(char::is_control) {
        return Err(LookupError::invalid_identifier(
            id,
            "identifier contains control characters",
        ));
    }
    Ok(format!("{}/{}.{}", DETAILS_DIR, id, DETAIL_EXTENSION))
}

/// Fetch and parse the detail record for `id`
pub async fn fetch_trafo_details(
    source: &dyn ResourceSource,
    id: &str,
    retry: &RetryPolicy,
) -> Result<DetailRecord> {
    let location = detail_location(id)?;
    debug!("Fetching detail record {} from {}", id, location);
    fetch_json(source, &location, retry).await
}
