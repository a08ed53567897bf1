use cafescout::analysis::flexible_match;
use cafescout::cafe::{Cafe, PriceRange};
use cafescout::catalog::Catalog;
use cafescout::filter::{FilterKey, FilterSet, passes_filters};
use cafescout::geo::DEFAULT_LOCATION;
use cafescout::ranking::{SearchRequest, SortMode, search};

use proptest::prelude::*;
use proptest::test_runner::Config;

fn catalog() -> Vec<Cafe> {
    Catalog::builtin().unwrap().cafes
}

fn ids(cafes: &[Cafe]) -> Vec<u64> {
    cafes.iter().map(|cafe| cafe.id.0).collect()
}

const TAG_KEYS: [FilterKey; 5] = [
    FilterKey::DogFriendly,
    FilterKey::CatFriendly,
    FilterKey::Wifi,
    FilterKey::PowerOutlets,
    FilterKey::Outdoor,
];

const PRICE_KEYS: [FilterKey; 3] = [FilterKey::Cheap, FilterKey::Moderate, FilterKey::Expensive];

#[test]
fn test_flexible_match_examples() {
    assert!(flexible_match("Cà Phê", "ca phe"));
    assert!(!flexible_match("Coffee", "xyz"));
    assert!(flexible_match("", ""));
    assert!(flexible_match("anything at all", ""));
}

#[test]
fn test_query_with_and_without_diacritics() {
    let cafes = catalog();
    let with_marks = search(&cafes, "cà phê", &FilterSet::new(), SortMode::ByRating, None);
    assert!(ids(&with_marks).contains(&3));

    let without_marks = search(&cafes, "cong ca phe", &FilterSet::new(), SortMode::ByRating, None);
    assert_eq!(ids(&without_marks), vec![3]);
}

#[test]
fn test_query_matches_address_and_tags() {
    let cafes = catalog();
    let by_address = search(&cafes, "ba dinh", &FilterSet::new(), SortMode::ByRating, None);
    let mut found = ids(&by_address);
    found.sort();
    assert_eq!(found, vec![11, 14]);

    let by_tag = search(&cafes, "書店", &FilterSet::new(), SortMode::ByRating, None);
    assert_eq!(ids(&by_tag), vec![8]);
}

#[test]
fn test_price_filters_are_or_combined() {
    let cafes = catalog();
    let filters = FilterSet::new()
        .with(FilterKey::Cheap)
        .with(FilterKey::Expensive);
    let results = search(&cafes, "", &filters, SortMode::ByRating, None);

    let mut found = ids(&results);
    found.sort();
    assert_eq!(found, vec![3, 4, 5, 10, 14, 15]);
    assert!(results.iter().all(|cafe| cafe.price_range != PriceRange::Moderate));
}

#[test]
fn test_tag_filters_are_and_combined() {
    let cafes = catalog();
    let filters = FilterSet::new()
        .with(FilterKey::Wifi)
        .with(FilterKey::PowerOutlets);
    let mut found = ids(&search(&cafes, "", &filters, SortMode::ByRating, None));
    found.sort();
    assert_eq!(found, vec![4, 11]);

    let dog = FilterSet::new().with(FilterKey::DogFriendly);
    assert_eq!(ids(&search(&cafes, "", &dog, SortMode::ByRating, None)), vec![9]);
}

#[test]
fn test_filter_and_query_combine() {
    let cafes = catalog();
    let filters = FilterSet::new().with(FilterKey::Cheap);
    let results = search(&cafes, "hoan kiem", &filters, SortMode::ByRating, None);
    assert_eq!(ids(&results), vec![10, 15]);
}

#[test]
fn test_rating_scenario() {
    let cafes = vec![
        Cafe::new(1, "A", 0.0, 0.0).with_rating(4.5).with_distance(1.0),
        Cafe::new(2, "B", 0.0, 0.0).with_rating(4.5).with_distance(0.5),
        Cafe::new(3, "C", 0.0, 0.0).with_rating(4.8).with_distance(5.0),
    ];
    let sorted = search(&cafes, "", &FilterSet::new(), SortMode::ByRating, None);
    let names: Vec<&str> = sorted.iter().map(|cafe| cafe.name.as_str()).collect();
    assert_eq!(names, vec!["C", "B", "A"]);
}

#[test]
fn test_rating_order_with_distance_tiebreak() {
    let sorted = search(
        &catalog(),
        "",
        &FilterSet::new(),
        SortMode::ByRating,
        Some(DEFAULT_LOCATION),
    );
    for pair in sorted.windows(2) {
        assert!(pair[0].rating >= pair[1].rating);
        if pair[0].rating == pair[1].rating {
            assert!(pair[0].distance.unwrap() <= pair[1].distance.unwrap());
        }
    }
}

#[test]
fn test_distance_order_from_user() {
    let sorted = search(
        &catalog(),
        "",
        &FilterSet::new(),
        SortMode::ByDistance,
        Some(DEFAULT_LOCATION),
    );
    assert_eq!(sorted.len(), 15);
    assert!(sorted.iter().all(|cafe| cafe.distance.is_some()));
    for pair in sorted.windows(2) {
        let (a, b) = (pair[0].distance.unwrap(), pair[1].distance.unwrap());
        // Out-of-order neighbours are only allowed inside the tie tolerance.
        assert!(a <= b || a - b < 0.1);
    }
}

#[test]
fn test_price_ascending_order() {
    let sorted = search(&catalog(), "", &FilterSet::new(), SortMode::ByPriceAscending, None);
    for pair in sorted.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(a.price_range.ordinal() <= b.price_range.ordinal());
        if a.price_range == b.price_range {
            assert!(a.rating >= b.rating);
        }
    }
    assert_eq!(sorted[0].id.0, 10);
}

#[test]
fn test_search_is_idempotent() {
    let cafes = catalog();
    let filters = FilterSet::new().with(FilterKey::Wifi);
    let request = SearchRequest::new("hanoi")
        .filters(filters)
        .sort_mode(SortMode::ByDistance)
        .user_location(Some(DEFAULT_LOCATION));

    let first = request.execute(&cafes);
    let second = request.execute(&cafes);
    assert_eq!(first, second);
    assert_eq!(first.total_hits, first.cafes.len());
    assert!(cafes.iter().all(|cafe| cafe.distance.is_none()));
}

#[test]
fn test_no_match_is_empty() {
    let results = search(&catalog(), "zzzz", &FilterSet::new(), SortMode::ByRating, None);
    assert!(results.is_empty());
}

fn count(cafes: &[Cafe], filters: &FilterSet) -> usize {
    cafes
        .iter()
        .filter(|cafe| passes_filters(cafe, filters, ""))
        .count()
}

proptest! {
    #![proptest_config(Config::with_cases(128))]
    #[test]
    fn tag_filters_never_grow_results(
        base in proptest::collection::vec(0usize..8, 0..4),
        extra in 0usize..5
    ) {
        let cafes = catalog();
        let f1: FilterSet = base.iter().map(|i| FilterKey::ALL[*i]).collect();
        let f2 = f1.clone().with(TAG_KEYS[extra]);
        prop_assert!(count(&cafes, &f2) <= count(&cafes, &f1));
    }

    #[test]
    fn first_price_filter_never_grows_results(
        tags in proptest::collection::vec(0usize..5, 0..3),
        price in 0usize..3
    ) {
        let cafes = catalog();
        let f1: FilterSet = tags.iter().map(|i| TAG_KEYS[*i]).collect();
        let f2 = f1.clone().with(PRICE_KEYS[price]);
        prop_assert!(count(&cafes, &f2) <= count(&cafes, &f1));
    }
}
