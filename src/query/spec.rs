use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Property-category filter over the `property_type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Apartments,
    Villas,
    Townhouses,
    /// Combined villa/townhouse outcome produced by free-text queries
    VillaTownhouse,
}

impl CategoryFilter {
    /// Case-insensitive substring test against a listing's property type.
    /// "apartment" covers both singular and plural forms.
    pub fn matches(&self, property_type: &str) -> bool {
        let t = property_type.to_lowercase();
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Apartments => t.contains("apartment"),
            CategoryFilter::Villas => t.contains("villa"),
            CategoryFilter::Townhouses => t.contains("townhouse"),
            CategoryFilter::VillaTownhouse => t.contains("villa") || t.contains("townhouse"),
        }
    }
}

/// Posted-date constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFilter {
    /// Same calendar day, not a rolling 24-hour window
    Today,
    /// Fractional elapsed days since posting is at most this many
    WithinDays(i64),
    /// Exact calendar date
    On(NaiveDate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateSort {
    #[default]
    Unset,
    NewestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceSort {
    #[default]
    Unset,
    HighToLow,
    LowToHigh,
}

/// The normalized filter/sort parameters driving the pipeline, whether set
/// from UI controls or inferred from a free-text query. Replacing the whole
/// value is how "clear all filters before applying a new query" works.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Resolved area selection; `None` means "all loaded areas"
    pub area: Option<String>,
    pub category: CategoryFilter,
    /// Exact bedroom-count match after integer normalization
    pub bedrooms: Option<u32>,
    /// Inclusive bounds, in AED
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub date: Option<DateFilter>,
    /// Free-text substring tested against building name, title and location
    pub search: Option<String>,
    pub sort_date: DateSort,
    pub sort_price: PriceSort,
}

impl FilterSpec {
    /// Whether any filtering criterion is set. Lets the presentation layer
    /// tell "no listings in area" apart from "filters excluded everything".
    pub fn is_active(&self) -> bool {
        self.category != CategoryFilter::All
            || self.bedrooms.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.date.is_some()
            || self.search.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_substring_matching() {
        assert!(CategoryFilter::Apartments.matches("Apartment"));
        assert!(CategoryFilter::Apartments.matches("Serviced Apartments"));
        assert!(!CategoryFilter::Apartments.matches("Villa"));
        assert!(CategoryFilter::VillaTownhouse.matches("Townhouse"));
        assert!(CategoryFilter::VillaTownhouse.matches("Luxury Villa"));
        assert!(CategoryFilter::All.matches("anything"));
    }

    #[test]
    fn default_spec_is_inactive() {
        let spec = FilterSpec::default();
        assert!(!spec.is_active());

        let spec = FilterSpec {
            bedrooms: Some(2),
            ..Default::default()
        };
        assert!(spec.is_active());
    }
}
