mod common;

use std::sync::Arc;

use common::{directory, listing, storage_key, MockFetcher};
use listing_scout::{CategoryFilter, FilterSpec, Session};

fn marina_and_bay() -> (Session, Arc<MockFetcher>) {
    let fetcher = Arc::new(MockFetcher::new());
    fetcher.insert(
        &storage_key("Dubai Marina"),
        vec![
            listing("Marina Gate 3BR", "AED 2,400,000", "3", "Apartment", "today"),
            listing("Marina Gate 2BR", "AED 1,600,000", "2", "Apartment", "yesterday"),
            listing("Marina Penthouse", "AED 9,000,000", "4", "Penthouse", "today"),
        ],
    );
    fetcher.insert(
        &storage_key("Business Bay"),
        vec![
            listing("Bay Tower 1BR", "AED 1,100,000", "1", "Apartment", "today"),
            listing("Bay Loft 3BR", "AED 2,900,000", "3", "Apartment", "yesterday"),
        ],
    );
    let session = Session::new(
        directory(&["Dubai Marina", "Business Bay"]),
        Arc::clone(&fetcher) as Arc<dyn listing_scout::AreaFetcher>,
    );
    (session, fetcher)
}

#[tokio::test]
async fn query_with_area_token_selects_and_loads_the_area() {
    let (mut session, _fetcher) = marina_and_bay();

    // stale filters from a previous interaction
    session.set_filters(FilterSpec {
        min_price: Some(5_000_000),
        bedrooms: Some(1),
        ..Default::default()
    });

    session
        .search("3 bedroom apartment in dubai marina")
        .await
        .unwrap();

    let filters = session.filters();
    assert_eq!(filters.bedrooms, Some(3));
    assert_eq!(filters.category, CategoryFilter::Apartments);
    assert_eq!(filters.area.as_deref(), Some("Dubai Marina"));
    // the new query fully reset the old price bound
    assert!(filters.min_price.is_none());
    assert!(filters.date.is_none());

    let results = session.results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Marina Gate 3BR");
    assert!(session.last_error().is_none());
}

#[tokio::test]
async fn global_query_searches_across_all_loaded_areas() {
    let (mut session, _fetcher) = marina_and_bay();

    // load the whole registry up front
    session.start_background_sweep().await.unwrap();

    session.search("under 2m").await.unwrap();
    assert!(session.filters().area.is_none());
    assert_eq!(session.filters().max_price, Some(2_000_000));

    let titles: Vec<String> = session
        .results()
        .iter()
        .map(|l| l.title.clone())
        .collect();
    assert!(titles.contains(&"Marina Gate 2BR".to_string()));
    assert!(titles.contains(&"Bay Tower 1BR".to_string()));
    assert!(!titles.contains(&"Marina Penthouse".to_string()));
}

#[tokio::test]
async fn empty_query_clears_filters_and_shows_everything() {
    let (mut session, _fetcher) = marina_and_bay();
    session.start_background_sweep().await.unwrap();

    session.search("under 2m").await.unwrap();
    assert!(session.filters().is_active());

    session.search("   ").await.unwrap();
    assert!(!session.filters().is_active());
    assert_eq!(session.results().len(), 5);
}

#[tokio::test]
async fn empty_result_is_distinguishable_from_empty_area() {
    let (mut session, fetcher) = marina_and_bay();
    fetcher.insert(&storage_key("Dubai Marina"), vec![]);

    session.select_area("Dubai Marina").await.unwrap();
    assert!(session.results().is_empty());
    // no filter is active: the area itself is empty
    assert!(!session.filters().is_active());

    session.search("9 bedroom in dubai marina").await.unwrap();
    assert!(session.results().is_empty());
    // this time the filters excluded everything
    assert!(session.filters().is_active());
}

#[tokio::test]
async fn building_token_filters_without_clearing_the_catalog() {
    let (mut session, _fetcher) = marina_and_bay();
    session.start_background_sweep().await.unwrap();

    // "bay tower" resolves no area, so it becomes a text filter over
    // building name, title and location
    session.search("apartments in bay tower").await.unwrap();
    assert!(session.filters().area.is_none());
    assert_eq!(session.filters().search.as_deref(), Some("bay tower"));

    let results = session.results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Bay Tower 1BR");
}

#[tokio::test]
async fn bedroom_options_are_normalized_and_sorted() {
    let fetcher = Arc::new(MockFetcher::new());
    fetcher.insert(
        &storage_key("Al Kifaf"),
        vec![
            listing("A", "AED 1,000,000", "02", "Apartment", "today"),
            listing("B", "AED 1,000,000", "2", "Apartment", "today"),
            listing("C", "AED 1,000,000", "0001", "Apartment", "today"),
            listing("D", "AED 1,000,000", "studio", "Apartment", "today"),
        ],
    );
    let mut session = Session::new(directory(&["Al Kifaf"]), fetcher);

    session.select_area("Al Kifaf").await.unwrap();
    assert_eq!(session.bedroom_options(), vec![1, 2]);
}

#[tokio::test]
async fn summary_aggregates_loaded_areas() {
    let (mut session, _fetcher) = marina_and_bay();

    let before = session.summary();
    assert_eq!(before.total_areas, 2);
    assert_eq!(before.loaded_areas, 0);
    assert!(before.average_price.is_none());

    session.start_background_sweep().await.unwrap();
    let after = session.summary();
    assert_eq!(after.loaded_areas, 2);
    assert_eq!(after.total_listings, 5);
    assert!(after.average_price.is_some());
    assert!(after.last_updated.is_some());

    let entry = session.area_entry("Business Bay").unwrap();
    assert_eq!(entry.total_listings, 2);
    assert_eq!(entry.lowest_price, Some(1_100_000));
    assert_eq!(entry.average_price, Some(2_000_000));
}
