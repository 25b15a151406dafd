use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::FetchError;
use crate::models::{AttributeItem, BasicInfo, ListingId, PageOutcome};
use crate::scrapers::ListingSource;

/// In-memory listing source. Pages past the configured ones are exhausted; listings without
/// a detail entry fail.
#[derive(Default)]
pub struct FakeSource {
    pub pages: Vec<Vec<(ListingId, BasicInfo)>>,
    pub failing_page: Option<u32>,
    pub details: HashMap<String, Vec<AttributeItem>>,
    pub requested_pages: Mutex<Vec<u32>>,
    pub requested_details: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn listing(id: &str, name: &str, locality: &str, price: f64) -> (ListingId, BasicInfo) {
        (
            ListingId::from(id),
            BasicInfo {
                name: name.to_string(),
                locality: locality.to_string(),
                price: Some(price),
                price_czk: None,
            },
        )
    }

    fn failure(url: String) -> FetchError {
        FetchError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            url,
        }
    }
}

#[async_trait]
impl ListingSource for FakeSource {
    async fn enumerate(&self, page: u32) -> PageOutcome {
        self.requested_pages.lock().unwrap().push(page);

        if self.failing_page == Some(page) {
            return PageOutcome::Failed(Self::failure(format!("page/{}", page)));
        }

        match (page as usize).checked_sub(1).and_then(|i| self.pages.get(i)) {
            Some(listings) if !listings.is_empty() => PageOutcome::Listings(listings.clone()),
            _ => PageOutcome::Exhausted,
        }
    }

    async fn fetch_detail(&self, id: &ListingId) -> Result<Vec<AttributeItem>, FetchError> {
        self.requested_details.lock().unwrap().push(id.to_string());

        self.details
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| Self::failure(format!("detail/{}", id)))
    }
}
