use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime};

use crate::models::Listing;
use crate::query::{DateFilter, DateSort, FilterSpec, PriceSort};

/// Run the current listing set through the filter conjunction and sort it.
/// `now` is passed in rather than read from the clock so date semantics are
/// deterministic for a whole pass (and for tests).
pub fn run(listings: &[Listing], spec: &FilterSpec, now: NaiveDateTime) -> Vec<Listing> {
    let today = now.date();
    let mut result: Vec<Listing> = listings
        .iter()
        .filter(|l| matches(l, spec, now))
        .cloned()
        .collect();
    // sort_by is stable, which the default ordering relies on
    result.sort_by(|a, b| compare(a, b, spec, today));
    result
}

/// Logical AND of every set criterion; unset criteria impose no constraint
pub fn matches(listing: &Listing, spec: &FilterSpec, now: NaiveDateTime) -> bool {
    let today = now.date();

    if !spec.category.matches(&listing.property_type) {
        return false;
    }

    if let Some(search) = &spec.search {
        let needle = search.to_lowercase();
        let building = listing.building_name().to_lowercase();
        let title = listing.title.to_lowercase();
        let location = listing.location.to_lowercase();
        if !building.contains(&needle)
            && !title.contains(&needle)
            && !location.contains(&needle)
        {
            return false;
        }
    }

    if let Some(beds) = spec.bedrooms {
        if listing.bedrooms() != Some(beds) {
            return false;
        }
    }

    if let Some(date_filter) = spec.date {
        // an unparseable posted date never matches a date constraint
        let Some(posted) = listing.posted(today) else {
            return false;
        };
        match date_filter {
            DateFilter::Today => {
                if posted.date() != today {
                    return false;
                }
            }
            DateFilter::WithinDays(n) => {
                let elapsed = now.signed_duration_since(posted);
                let days = elapsed.num_seconds() as f64 / 86_400.0;
                if days > n as f64 {
                    return false;
                }
            }
            DateFilter::On(day) => {
                if posted.date() != day {
                    return false;
                }
            }
        }
    }

    let price = listing.numeric_price();
    if let Some(min) = spec.min_price {
        if price < min {
            return false;
        }
    }
    if let Some(max) = spec.max_price {
        if price > max {
            return false;
        }
    }

    true
}

fn is_na_location(location: &str) -> bool {
    location.trim().eq_ignore_ascii_case("n/a")
}

/// Sort comparator. Precedence: "N/A" locations always sort last; with no
/// mode set, today's listings come first and everything else keeps its
/// original order; with both modes set, price is primary and the posted date
/// only breaks exact price ties. Unparseable dates sort as the earliest
/// possible value.
fn compare(a: &Listing, b: &Listing, spec: &FilterSpec, today: NaiveDate) -> Ordering {
    match (is_na_location(&a.location), is_na_location(&b.location)) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }

    let price_cmp = || match spec.sort_price {
        PriceSort::HighToLow => b.numeric_price().cmp(&a.numeric_price()),
        PriceSort::LowToHigh => a.numeric_price().cmp(&b.numeric_price()),
        PriceSort::Unset => Ordering::Equal,
    };
    // Option ordering puts None (unparseable, i.e. earliest) before Some
    let date_cmp = || match spec.sort_date {
        DateSort::NewestFirst => b.posted(today).cmp(&a.posted(today)),
        DateSort::OldestFirst => a.posted(today).cmp(&b.posted(today)),
        DateSort::Unset => Ordering::Equal,
    };

    match (spec.sort_price, spec.sort_date) {
        (PriceSort::Unset, DateSort::Unset) => {
            let a_today = a.posted(today).map_or(false, |d| d.date() == today);
            let b_today = b.posted(today).map_or(false, |d| d.date() == today);
            // today-first; ties stay in pre-sort order
            (!a_today).cmp(&!b_today)
        }
        (PriceSort::Unset, _) => date_cmp(),
        (_, DateSort::Unset) => price_cmp(),
        _ => price_cmp().then_with(date_cmp),
    }
}
