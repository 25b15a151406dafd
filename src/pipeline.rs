use anyhow::{Context, Result};
use chrono::Local;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::{AttributeField, AttributeItem, BasicInfo, CanonicalRecord, ListingId, PageOutcome};
use crate::parsers::{
    extract_rooms_from_name, extract_size_from_name, format_price, normalize_attributes,
    parse_district, parse_neighborhood,
};
use crate::scrapers::ListingSource;
use crate::storage::{discover_data_files, filter_new, load_existing_ids, write_records, WriteMode};
use crate::utils::delay::polite_pause;
use crate::utils::progress::progress_bar;

#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    pub max_pages: u32,
    pub output_path: PathBuf,
    pub mode: WriteMode,
}

/// Why page enumeration ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationStop {
    PageLimit,
    Exhausted { page: u32 },
    Failed { page: u32 },
}

impl fmt::Display for EnumerationStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumerationStop::PageLimit => write!(f, "page limit reached"),
            EnumerationStop::Exhausted { page } => write!(f, "no listings at page {}", page),
            EnumerationStop::Failed { page } => write!(f, "request failed at page {}", page),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub stop: EnumerationStop,
    pub found: usize,
    pub previously_seen: usize,
    pub skipped: usize,
    pub failed_details: usize,
    pub written: usize,
    /// Set only when the output file was written
    pub output: Option<PathBuf>,
}

impl ScrapeSummary {
    fn new(stop: EnumerationStop, found: usize) -> Self {
        Self {
            stop,
            found,
            previously_seen: 0,
            skipped: 0,
            failed_details: 0,
            written: 0,
            output: None,
        }
    }
}

/// Combine enumeration fields, normalized detail attributes and name/locality derived fields
pub fn build_record(
    id: &ListingId,
    basic: &BasicInfo,
    items: &[AttributeItem],
    scrape_date: &str,
) -> CanonicalRecord {
    let mut record = CanonicalRecord {
        scrape_date: scrape_date.to_string(),
        hash_id: id.to_string(),
        name: basic.name.clone(),
        locality: basic.locality.clone(),
        district: parse_district(&basic.locality),
        neighborhood: parse_neighborhood(&basic.locality),
        price_czk: format_price(basic),
        rooms: extract_rooms_from_name(&basic.name),
        ..Default::default()
    };

    for (field, value) in normalize_attributes(items) {
        *record.field_mut(field) = value;
    }

    // Name-derived size only when the detail call had none
    if record.size_m2.is_empty() {
        *record.field_mut(AttributeField::SizeM2) = extract_size_from_name(&basic.name);
    }

    record
}

/// Enumerate pages, skip known listings, fetch details and write all records at the end
pub async fn run_scrape(
    config: &Config,
    source: &dyn ListingSource,
    options: &ScrapeOptions,
) -> Result<ScrapeSummary> {
    let output_dir = &config.output.dir;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let (candidates, stop) = enumerate_listings(config, source, options.max_pages).await;
    info!("Found {} listings", candidates.len());

    let mut summary = ScrapeSummary::new(stop, candidates.len());
    if candidates.is_empty() {
        info!("No listings found. Check your internet connection.");
        return Ok(summary);
    }

    let data_files = discover_data_files(output_dir, &config.output.file_prefix, None)?;
    let existing = load_existing_ids(&data_files)?;
    let candidates = if existing.is_empty() {
        candidates
    } else {
        let before = candidates.len();
        let fresh = filter_new(candidates, &existing);
        summary.previously_seen = existing.len();
        summary.skipped = before - fresh.len();
        info!("Found {} previously scraped listings.", existing.len());
        info!(
            "Skipping {} duplicates, {} new listings to fetch.",
            summary.skipped,
            fresh.len()
        );
        fresh
    };

    if candidates.is_empty() {
        info!("No new listings to scrape.");
        return Ok(summary);
    }

    let total = candidates.len();
    let mut records = Vec::with_capacity(total);
    let bar = progress_bar(total as u64, "Listings");

    for (id, basic) in &candidates {
        let items = match source.fetch_detail(id).await {
            Ok(items) => items,
            Err(_) => {
                // Already logged by the source; no partial record
                summary.failed_details += 1;
                bar.inc(1);
                continue;
            }
        };

        let scrape_date = Local::now().format("%Y-%m-%d").to_string();
        records.push(build_record(id, basic, &items, &scrape_date));
        bar.inc(1);
        polite_pause(config.delays.detail_range()).await;
    }
    bar.finish();

    summary.written = write_records(&options.output_path, &records, options.mode)?;
    summary.output = Some(options.output_path.clone());
    info!(
        "Saved {} listings to {}",
        summary.written,
        options.output_path.display()
    );
    if summary.failed_details > 0 {
        warn!("{} listings skipped after failed detail requests", summary.failed_details);
    }

    Ok(summary)
}

async fn enumerate_listings(
    config: &Config,
    source: &dyn ListingSource,
    max_pages: u32,
) -> (Vec<(ListingId, BasicInfo)>, EnumerationStop) {
    let mut listings = Vec::new();
    let bar = progress_bar(u64::from(max_pages), "Pages");

    for page in 1..=max_pages {
        match source.enumerate(page).await {
            PageOutcome::Listings(found) => {
                listings.extend(found);
                bar.inc(1);
                polite_pause(config.delays.page_range()).await;
            }
            PageOutcome::Exhausted => {
                bar.abandon();
                info!("No more listings found at page {}. Stopping.", page);
                return (listings, EnumerationStop::Exhausted { page });
            }
            PageOutcome::Failed(e) => {
                // A failed page ends enumeration like an empty one, but is reported as such
                bar.abandon();
                warn!("Stopping enumeration at page {} after a failed request: {}", page, e);
                return (listings, EnumerationStop::Failed { page });
            }
        }
    }

    bar.finish();
    (listings, EnumerationStop::PageLimit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DelayConfig;
    use crate::models::AttributeValue;
    use crate::scrapers::fake::FakeSource;
    use crate::storage::{read_records, write_records};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::path::Path;

    fn test_config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.output.dir = dir.to_path_buf();
        config.delays = DelayConfig::disabled();
        config
    }

    fn options(config: &Config, max_pages: u32) -> ScrapeOptions {
        ScrapeOptions {
            max_pages,
            output_path: config.output.dir.join("sreality_run.csv"),
            mode: WriteMode::Create,
        }
    }

    fn detail(items: serde_json::Value) -> Vec<AttributeItem> {
        serde_json::from_value(items).unwrap()
    }

    #[test]
    fn stop_reasons_read_as_log_text() {
        assert_eq!(EnumerationStop::PageLimit.to_string(), "page limit reached");
        assert_eq!(
            EnumerationStop::Exhausted { page: 4 }.to_string(),
            "no listings at page 4"
        );
        assert_eq!(
            EnumerationStop::Failed { page: 2 }.to_string(),
            "request failed at page 2"
        );
    }

    #[test]
    fn build_record_combines_all_sources() {
        let basic = BasicInfo {
            name: "Pronájem bytu 2+kk 55 m²".to_string(),
            locality: "Praha 5 - Smíchov".to_string(),
            price: Some(25000.0),
            price_czk: Some(25000.0),
        };
        let items = vec![
            AttributeItem::new("Podlaží", AttributeValue::Text("3. podlaží".to_string())),
            AttributeItem::new("Výtah", AttributeValue::Flag(true)),
            AttributeItem::new("Užitná plocha", AttributeValue::Number(57.into())),
        ];

        let record = build_record(&ListingId::from("123"), &basic, &items, "2024-03-01");

        assert_eq!(
            record,
            CanonicalRecord {
                scrape_date: "2024-03-01".to_string(),
                hash_id: "123".to_string(),
                name: "Pronájem bytu 2+kk 55 m²".to_string(),
                locality: "Praha 5 - Smíchov".to_string(),
                district: "Praha 5".to_string(),
                neighborhood: "Smíchov".to_string(),
                price_czk: "25000".to_string(),
                size_m2: "57".to_string(),
                rooms: "2+kk".to_string(),
                floor: "3. podlaží".to_string(),
                elevator: "True".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn build_record_falls_back_to_size_from_name() {
        let basic = BasicInfo {
            name: "Pronájem bytu 1+1 38 m²".to_string(),
            locality: "Brno".to_string(),
            ..Default::default()
        };

        let record = build_record(&ListingId::from("9"), &basic, &[], "2024-03-01");

        assert_eq!(record.size_m2, "38");
        assert_eq!(record.rooms, "1+1");
        assert_eq!(record.district, "");
        assert_eq!(record.price_czk, "");
    }

    #[tokio::test]
    async fn scrape_writes_records_for_new_listings() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let source = FakeSource {
            pages: vec![
                vec![
                    FakeSource::listing("1", "Pronájem bytu 2+kk 50 m²", "Praha 2 - Vinohrady", 20000.0),
                    FakeSource::listing("2", "Pronájem bytu 3+1", "Praha 6 - Dejvice", 30000.0),
                ],
                vec![FakeSource::listing("3", "Atypický byt", "Praha 1", 40000.0)],
            ],
            details: HashMap::from([
                ("1".to_string(), detail(json!([{"name": "Stav objektu", "value": "Velmi dobrý"}]))),
                ("2".to_string(), detail(json!([]))),
                ("3".to_string(), detail(json!([{"name": "Plocha", "value": 120}]))),
            ]),
            ..Default::default()
        };
        let options = options(&config, 30);

        let summary = run_scrape(&config, &source, &options).await.unwrap();

        assert_eq!(summary.stop, EnumerationStop::Exhausted { page: 3 });
        assert_eq!(summary.found, 3);
        assert_eq!(summary.written, 3);
        assert_eq!(summary.output, Some(options.output_path.clone()));

        let records = read_records(&options.output_path).unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.hash_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(records[0].condition, "Velmi dobrý");
        assert_eq!(records[0].size_m2, "50");
        assert_eq!(records[1].size_m2, "");
        assert_eq!(records[2].size_m2, "120");
        assert_eq!(records[2].rooms, "atypicky");
    }

    #[tokio::test]
    async fn known_listings_are_not_fetched_again() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let previous = CanonicalRecord {
            hash_id: "1".to_string(),
            ..Default::default()
        };
        write_records(&dir.path().join("sreality_old.csv"), &[previous], WriteMode::Create).unwrap();

        let source = FakeSource {
            pages: vec![vec![
                FakeSource::listing("1", "Byt", "Praha 1", 1.0),
                FakeSource::listing("2", "Byt", "Praha 2", 2.0),
            ]],
            details: HashMap::from([("2".to_string(), Vec::new())]),
            ..Default::default()
        };

        let summary = run_scrape(&config, &source, &options(&config, 5)).await.unwrap();

        assert_eq!(summary.previously_seen, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.written, 1);
        assert_eq!(*source.requested_details.lock().unwrap(), vec!["2".to_string()]);
    }

    #[tokio::test]
    async fn nothing_new_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let previous = CanonicalRecord {
            hash_id: "1".to_string(),
            ..Default::default()
        };
        write_records(&dir.path().join("sreality_old.csv"), &[previous], WriteMode::Create).unwrap();
        let source = FakeSource {
            pages: vec![vec![FakeSource::listing("1", "Byt", "Praha 1", 1.0)]],
            ..Default::default()
        };
        let options = options(&config, 5);

        let summary = run_scrape(&config, &source, &options).await.unwrap();

        assert_eq!(summary.output, None);
        assert!(!options.output_path.exists());
    }

    #[tokio::test]
    async fn failed_detail_skips_listing() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let source = FakeSource {
            pages: vec![vec![
                FakeSource::listing("1", "Byt", "Praha 1", 1.0),
                FakeSource::listing("2", "Byt", "Praha 2", 2.0),
            ]],
            details: HashMap::from([("2".to_string(), Vec::new())]),
            ..Default::default()
        };
        let options = options(&config, 5);

        let summary = run_scrape(&config, &source, &options).await.unwrap();

        assert_eq!(summary.failed_details, 1);
        let records = read_records(&options.output_path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hash_id, "2");
    }

    #[tokio::test]
    async fn failed_page_stops_enumeration_and_keeps_earlier_pages() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let source = FakeSource {
            pages: vec![
                vec![FakeSource::listing("1", "Byt", "Praha 1", 1.0)],
                vec![FakeSource::listing("2", "Byt", "Praha 2", 2.0)],
                vec![FakeSource::listing("3", "Byt", "Praha 3", 3.0)],
            ],
            failing_page: Some(2),
            details: HashMap::from([("1".to_string(), Vec::new())]),
            ..Default::default()
        };

        let summary = run_scrape(&config, &source, &options(&config, 5)).await.unwrap();

        assert_eq!(summary.stop, EnumerationStop::Failed { page: 2 });
        assert_eq!(summary.found, 1);
        assert_eq!(*source.requested_pages.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn page_limit_bounds_enumeration() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let source = FakeSource {
            pages: vec![
                vec![FakeSource::listing("1", "Byt", "Praha 1", 1.0)],
                vec![FakeSource::listing("2", "Byt", "Praha 2", 2.0)],
            ],
            details: HashMap::from([("1".to_string(), Vec::new())]),
            ..Default::default()
        };

        let summary = run_scrape(&config, &source, &options(&config, 1)).await.unwrap();

        assert_eq!(summary.stop, EnumerationStop::PageLimit);
        assert_eq!(*source.requested_pages.lock().unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn empty_first_page_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let source = FakeSource::default();
        let options = options(&config, 30);

        let summary = run_scrape(&config, &source, &options).await.unwrap();

        assert_eq!(summary.found, 0);
        assert_eq!(summary.stop, EnumerationStop::Exhausted { page: 1 });
        assert!(!options.output_path.exists());
    }

    #[tokio::test]
    async fn append_mode_extends_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let output_path = dir.path().join("rolling.csv");
        let first = FakeSource {
            pages: vec![vec![FakeSource::listing("1", "Byt", "Praha 1", 1.0)]],
            details: HashMap::from([("1".to_string(), Vec::new())]),
            ..Default::default()
        };
        let second = FakeSource {
            pages: vec![vec![FakeSource::listing("2", "Byt", "Praha 2", 2.0)]],
            details: HashMap::from([("2".to_string(), Vec::new())]),
            ..Default::default()
        };
        let options = ScrapeOptions {
            max_pages: 3,
            output_path: output_path.clone(),
            mode: WriteMode::Append,
        };

        run_scrape(&config, &first, &options).await.unwrap();
        run_scrape(&config, &second, &options).await.unwrap();

        let ids: Vec<String> = read_records(&output_path)
            .unwrap()
            .into_iter()
            .map(|r| r.hash_id)
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
