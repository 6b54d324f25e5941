use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::AreaDirectory;
use crate::query::spec::{CategoryFilter, DateFilter, FilterSpec};

static BEDROOMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*bed(?:room)?s?").unwrap());

static PRICE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:(?:range|between)\s+)?(\d[\d,\.]*)\s*(m\b)?\s*(?:aed\s*)?(?:to|and|-|–|—)\s*(\d[\d,\.]*)\s*(m\b)?").unwrap()
});

static MAX_PRICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:under|below|up to|less than|maximum|max)\s+(\d[\d,\.]*)\s*(m\b)?").unwrap()
});

static MIN_PRICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:above|over|from|starting at|start at)\s+(\d[\d,\.]*)\s*(m\b)?").unwrap()
});

static ON_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bon\s+(\d{1,2})(?:st|nd|rd|th)?\s+([a-z]+)").unwrap());

static AREA_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:in|from|at|near|around|within|by|beside|inside|to|for)\s+([a-z][a-z0-9\s\-']*)")
        .unwrap()
});

/// Words that end an area/building token when the capture runs past it into
/// a price or date phrase
const TOKEN_BREAKERS: &[&str] = &[
    "under", "above", "over", "below", "between", "range", "posted", "last", "on", "from", "max",
    "maximum",
];

/// Turns a free-text query into a structured filter specification.
///
/// Extraction is deterministic pattern matching, never NLU: unrecognized
/// text simply leaves fields unset, and the returned spec is always a fresh
/// value so a new query fully resets the previous filters.
pub struct QueryInterpreter {
    directory: Arc<AreaDirectory>,
}

impl QueryInterpreter {
    pub fn new(directory: Arc<AreaDirectory>) -> Self {
        Self { directory }
    }

    pub fn interpret(&self, text: &str, today: NaiveDate) -> FilterSpec {
        let mut spec = FilterSpec::default();
        let q = text.trim().to_lowercase();
        if q.is_empty() {
            return spec;
        }

        if let Some(caps) = BEDROOMS.captures(&q) {
            spec.bedrooms = caps[1].parse().ok();
        }

        // "apartment" wins when both category tokens appear
        if q.contains("apartment") {
            spec.category = CategoryFilter::Apartments;
        } else if q.contains("villa") || q.contains("townhouse") {
            spec.category = CategoryFilter::VillaTownhouse;
        }

        spec.date = extract_date(&q, today);
        extract_price(&q, &mut spec);

        if let Some(caps) = AREA_TOKEN.captures(&q) {
            let token = trim_token(&caps[1]);
            if !token.is_empty() {
                // An area match suppresses the building-text filter
                match self.directory.resolve_token(&token) {
                    Some(area) => spec.area = Some(area.name.clone()),
                    None => spec.search = Some(token),
                }
            }
        }

        spec
    }
}

fn extract_date(q: &str, today: NaiveDate) -> Option<DateFilter> {
    if q.contains("today") {
        return Some(DateFilter::Today);
    }
    if q.contains("last 7 days") {
        return Some(DateFilter::WithinDays(7));
    }
    if q.contains("last 30 days") {
        return Some(DateFilter::WithinDays(30));
    }
    if let Some(caps) = ON_DATE.captures(q) {
        let day: u32 = caps[1].parse().ok()?;
        let month = month_from_name(&caps[2])?;
        // invalid day/month combinations clear the constraint
        return NaiveDate::from_ymd_opt(today.year(), month, day).map(DateFilter::On);
    }
    None
}

fn extract_price(q: &str, spec: &mut FilterSpec) {
    if let Some(caps) = PRICE_RANGE.captures(q) {
        spec.min_price = parse_amount(&caps[1], caps.get(2).is_some());
        spec.max_price = parse_amount(&caps[3], caps.get(4).is_some());
    } else if let Some(caps) = MAX_PRICE.captures(q) {
        spec.max_price = parse_amount(&caps[1], caps.get(2).is_some());
    } else if let Some(caps) = MIN_PRICE.captures(q) {
        spec.min_price = parse_amount(&caps[1], caps.get(2).is_some());
    }
}

fn trim_token(raw: &str) -> String {
    let mut words = Vec::new();
    for word in raw.split_whitespace() {
        if TOKEN_BREAKERS.contains(&word) {
            break;
        }
        words.push(word);
    }
    words.join(" ")
}

/// Interpret a price token in AED. An explicit `m` suffix scales by one
/// million; a bare number below 10,000 without thousands separators is
/// treated as millions too, matching how prices are displayed ("5.0M").
fn parse_amount(raw: &str, millions_suffix: bool) -> Option<u64> {
    let has_separator = raw.contains(',');
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let value: f64 = cleaned.parse().ok()?;

    let scaled = if millions_suffix || (!has_separator && value < 10_000.0) {
        value * 1_000_000.0
    } else {
        value
    };
    Some(scaled.round() as u64)
}

fn month_from_name(name: &str) -> Option<u32> {
    const MONTHS: &[&str] = &[
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    MONTHS
        .iter()
        .position(|m| *m == name || (name.len() >= 3 && m.starts_with(name)))
        .map(|i| i as u32 + 1)
}
