use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::{AttributeItem, ListingId, PageOutcome};

mod sreality;

pub use sreality::SrealityClient;

/// Remote source of listings: paginated enumeration plus per-listing detail
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Listings on a 1-based result page
    async fn enumerate(&self, page: u32) -> PageOutcome;

    /// Full attribute list of one listing
    async fn fetch_detail(&self, id: &ListingId) -> Result<Vec<AttributeItem>, FetchError>;
}

#[cfg(test)]
pub mod fake;
