use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::fmt;

use crate::error::FetchError;

// NewType pattern for the deduplication key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl ListingId {
    /// Accepts the identifier as the API sends it: a JSON number or a string.
    /// Null, empty and zero identifiers are rejected.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ListingId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Fields captured from the enumeration call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub name: String,
    pub locality: String,
    pub price: Option<f64>,
    pub price_czk: Option<f64>,
}

impl BasicInfo {
    /// Listed price, falling back to the CZK raw value when the price is absent or zero
    pub fn effective_price(&self) -> Option<f64> {
        self.price
            .filter(|p| *p != 0.0)
            .or(self.price_czk)
    }
}

/// One labeled attribute from the detail call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeItem {
    #[serde(default, deserialize_with = "label_or_empty")]
    pub name: String,
    #[serde(default)]
    pub value: Option<AttributeValue>,
}

impl AttributeItem {
    #[cfg(test)]
    pub fn new(name: &str, value: AttributeValue) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value),
        }
    }
}

// Null or non-string labels match no synonym, so they read as empty
fn label_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<Value>::deserialize(deserializer)?;
    Ok(match label {
        Some(Value::String(s)) => s,
        _ => String::new(),
    })
}

/// Heterogeneous value shapes seen in detail attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Number(Number),
    Flag(bool),
    List(Vec<ListEntry>),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListEntry {
    Labeled { value: Value },
    Plain(Value),
}

/// Result of enumerating one page. An exhausted page and a failed request are kept apart
/// so the caller can tell end-of-data from a transient error.
#[derive(Debug)]
pub enum PageOutcome {
    Listings(Vec<(ListingId, BasicInfo)>),
    Exhausted,
    Failed(FetchError),
}
