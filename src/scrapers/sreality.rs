use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::models::{AttributeItem, BasicInfo, ListingId, PageOutcome};
use crate::scrapers::ListingSource;
use crate::utils::http::{create_client, fetch_json};

pub struct SrealityClient {
    client: Client,
    api: ApiConfig,
}

impl SrealityClient {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(api)?,
            api: api.clone(),
        })
    }

    fn page_url(&self, page: u32) -> Result<String, FetchError> {
        let query = serde_urlencoded::to_string(self.api.page_query(page)).map_err(|e| {
            FetchError::InvalidUrl {
                base: self.api.base_url.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(format!("{}?{}", self.api.base_url, query))
    }

    fn detail_url(&self, id: &ListingId) -> Result<String, FetchError> {
        let invalid = |reason: String| FetchError::InvalidUrl {
            base: self.api.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.api.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("URL cannot have path segments".to_string()))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url.to_string())
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<(ListingId, BasicInfo)>, FetchError> {
        let url = self.page_url(page)?;
        let body: Value = fetch_json(&self.client, &url).await?;

        let listings: Vec<_> = body
            .pointer("/_embedded/estates")
            .and_then(Value::as_array)
            .map(|estates| estates.iter().filter_map(parse_estate).collect())
            .unwrap_or_default();

        Ok(listings)
    }
}

#[async_trait]
impl ListingSource for SrealityClient {
    async fn enumerate(&self, page: u32) -> PageOutcome {
        match self.fetch_page(page).await {
            Ok(listings) if listings.is_empty() => {
                debug!("Page {} returned no listings", page);
                PageOutcome::Exhausted
            }
            Ok(listings) => {
                debug!("Page {} returned {} listings", page, listings.len());
                PageOutcome::Listings(listings)
            }
            Err(e) => {
                warn!("Error fetching page {}: {}", page, e);
                PageOutcome::Failed(e)
            }
        }
    }

    async fn fetch_detail(&self, id: &ListingId) -> Result<Vec<AttributeItem>, FetchError> {
        let url = self.detail_url(id)?;

        match fetch_json::<Value>(&self.client, &url).await {
            Ok(detail) => Ok(parse_items(&detail)),
            Err(e) => {
                warn!("Error fetching detail {}: {}", id, e);
                Err(e)
            }
        }
    }
}

// Each field is read on its own; a wrong type reads as the default

fn parse_estate(estate: &Value) -> Option<(ListingId, BasicInfo)> {
    let id = ListingId::from_json(estate.get("hash_id")?)?;
    let text = |key: &str| {
        estate
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let info = BasicInfo {
        name: text("name"),
        locality: text("locality"),
        price: estate.get("price").and_then(Value::as_f64),
        price_czk: estate.pointer("/price_czk/value_raw").and_then(Value::as_f64),
    };
    Some((id, info))
}

fn parse_items(detail: &Value) -> Vec<AttributeItem> {
    detail
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}
