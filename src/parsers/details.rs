use once_cell::sync::Lazy;
use regex::Regex;

static ROOMS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d\+(?:kk|1|2|3))")
        .expect("Invalid rooms regex")
});

static SIZE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*m[²2]")
        .expect("Invalid size regex")
});

const ATYPICAL_MARKER: &str = "atypick";
const ATYPICAL_LAYOUT: &str = "atypicky";

/// Parse room layout (e.g. "2+kk", "3+1") from a listing name
pub fn extract_rooms_from_name(name: &str) -> String {
    if let Some(captures) = ROOMS_REGEX.captures(name) {
        return captures[1].to_string();
    }

    if name.to_lowercase().contains(ATYPICAL_MARKER) {
        return ATYPICAL_LAYOUT.to_string();
    }

    String::new()
}

/// Parse floor area in square meters from a listing name
pub fn extract_size_from_name(name: &str) -> String {
    SIZE_REGEX
        .captures(name)
        .map(|captures| captures[1].to_string())
        .unwrap_or_default()
}
