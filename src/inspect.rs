use std::collections::BTreeSet;
use std::fmt::Write;
use tracing::{info, warn};

use crate::models::{ListingId, PageOutcome};
use crate::parsers::{field_for_label, render_value};
use crate::scrapers::ListingSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeLine {
    pub label: String,
    pub value: String,
    pub column: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectedListing {
    pub id: ListingId,
    pub name: String,
    pub attributes: Vec<AttributeLine>,
}

/// Fetch the first `count` listings of page 1 and resolve every raw attribute label
/// against the synonym map
pub async fn inspect_listings(source: &dyn ListingSource, count: usize) -> Vec<InspectedListing> {
    let listings = match source.enumerate(1).await {
        PageOutcome::Listings(listings) => listings,
        PageOutcome::Exhausted => {
            info!("No listings on the first page");
            return Vec::new();
        }
        PageOutcome::Failed(e) => {
            warn!("Could not enumerate listings: {}", e);
            return Vec::new();
        }
    };

    let mut inspected = Vec::new();
    for (id, basic) in listings.into_iter().take(count) {
        let Ok(items) = source.fetch_detail(&id).await else {
            continue;
        };

        let attributes = items
            .iter()
            .map(|item| AttributeLine {
                label: item.name.clone(),
                value: item.value.as_ref().map(render_value).unwrap_or_default(),
                column: field_for_label(&item.name).map(|field| field.column()),
            })
            .collect();

        inspected.push(InspectedListing {
            id,
            name: basic.name,
            attributes,
        });
    }

    inspected
}

/// Plain-text report: one block per listing, then the labels no column picks up
pub fn render_report(listings: &[InspectedListing]) -> String {
    let mut out = String::new();
    let mut unmapped = BTreeSet::new();

    for listing in listings {
        let _ = writeln!(out, "=== {} ({}) ===", listing.name, listing.id);
        for line in &listing.attributes {
            let _ = writeln!(
                out,
                "  {:<35} -> {:<18} {}",
                line.label,
                line.column.unwrap_or("-"),
                line.value
            );
            if line.column.is_none() {
                unmapped.insert(line.label.as_str());
            }
        }
        out.push('\n');
    }

    if !unmapped.is_empty() {
        let labels: Vec<&str> = unmapped.into_iter().collect();
        let _ = writeln!(out, "Unmapped labels: {}", labels.join(", "));
    }

    out
}
