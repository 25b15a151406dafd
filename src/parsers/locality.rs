use once_cell::sync::Lazy;
use regex::Regex;

static DISTRICT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Praha\s+(\d+)")
        .expect("Invalid district regex")
});

static NEIGHBORHOOD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Praha\s+\d+\s*-\s*(.+)")
        .expect("Invalid neighborhood regex")
});

/// Numbered Prague district ("Praha 5") from a locality string
pub fn parse_district(locality: &str) -> String {
    DISTRICT_REGEX
        .captures(locality)
        .map(|captures| format!("Praha {}", &captures[1]))
        .unwrap_or_default()
}

/// Part of the locality after "Praha <n> -"
pub fn parse_neighborhood(locality: &str) -> String {
    NEIGHBORHOOD_REGEX
        .captures(locality)
        .map(|captures| captures[1].trim().to_string())
        .unwrap_or_default()
}
