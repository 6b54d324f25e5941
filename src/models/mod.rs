use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Coarse property grouping an area belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Villas,
    Townhouses,
    Apartments,
    Commercials,
}

/// One entry of the static area registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    /// Human-readable name, also used as the matching token for queries
    pub name: String,
    /// Object name of the area's dataset in remote storage
    pub storage_key: String,
    pub category: Category,
}

/// One real-estate listing as stored in the per-area JSON datasets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub title: String,
    /// Display price, e.g. "AED 2,500,000"
    pub price: String,
    #[serde(default)]
    pub price_number: u64,
    pub location: String,
    pub property_type: String,
    #[serde(default)]
    pub beds: String,
    /// Raw bedroom count, possibly zero-padded ("0001")
    pub bedroom_count: String,
    #[serde(default)]
    pub size: String,
    pub link: String,
    pub building_url: String,
    /// Locale-formatted posted date, not a fixed format
    pub posted_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_sqft: Option<f64>,
}

impl Listing {
    /// Numeric price derived from the display price by stripping every
    /// non-digit character; falls back to the stored `price_number` when
    /// the display string carries no digits at all.
    pub fn numeric_price(&self) -> u64 {
        parse_price(&self.price).unwrap_or(self.price_number)
    }

    /// Normalized bedroom count ("02" and "2" are the same value)
    pub fn bedrooms(&self) -> Option<u32> {
        parse_bedrooms(&self.bedroom_count)
    }

    /// Human-readable building name derived from the building URL
    pub fn building_name(&self) -> String {
        building_name(&self.building_url)
    }

    /// Posted date, leniently parsed; `None` when unparseable
    pub fn posted(&self, today: NaiveDate) -> Option<NaiveDateTime> {
        parse_posted_date(&self.posted_date, today)
    }
}

/// Parse a display price by keeping only its digits
pub fn parse_price(display: &str) -> Option<u64> {
    let digits: String = display.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parse the leading integer of a raw bedroom string, `parseInt`-style.
/// Returns `None` when the string does not start with a digit.
pub fn parse_bedrooms(raw: &str) -> Option<u32> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Derive a display name from a building URL: take the second-to-last path
/// segment (the last one when the URL ends in a trailing slash), replace
/// hyphens with spaces and capitalize each word.
pub fn building_name(url: &str) -> String {
    let parts: Vec<&str> = url.split('/').collect();
    let segment = match parts.len() {
        0 => "",
        1 => parts[0],
        n => {
            if parts[n - 2].is_empty() {
                parts[n - 1]
            } else {
                parts[n - 2]
            }
        }
    };

    segment
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Leniently parse a posted-date string. The datasets mix literal markers
/// ("today", "yesterday"), ISO dates and a handful of locale formats; a
/// string matching none of them yields `None` and is never an error.
pub fn parse_posted_date(raw: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.to_lowercase().as_str() {
        "today" => return today.and_hms_opt(0, 0, 0),
        "yesterday" => return today.pred_opt()?.and_hms_opt(0, 0, 0),
        _ => {}
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    None
}
