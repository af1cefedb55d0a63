use super::*;

use std::collections::BTreeSet;

use chrono::{Duration, TimeZone};

use crate::domain::{DestinationId, PointId, PointType};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn point(from_hours: i64, to_hours: i64) -> Point {
    Point {
        id: PointId::random(),
        point_type: PointType::Bus,
        date_from: now() + Duration::hours(from_hours),
        date_to: now() + Duration::hours(to_hours),
        base_price: 10,
        destination: DestinationId(1),
        offers: BTreeSet::new(),
        is_favorite: false,
    }
}

#[test]
fn everything_keeps_the_whole_set() {
    let points = vec![point(-5, -3), point(-1, 1), point(2, 4)];
    assert_eq!(
        filter_points(FilterKind::Everything, &points, now()).len(),
        points.len()
    );
}

#[test]
fn filters_split_by_time_relative_to_now() {
    let past = point(-5, -3);
    let present = point(-1, 1);
    let future = point(2, 4);
    let points = vec![future.clone(), past.clone(), present.clone()];

    assert_eq!(filter_points(FilterKind::Past, &points, now()), vec![past]);
    assert_eq!(
        filter_points(FilterKind::Present, &points, now()),
        vec![present]
    );
    assert_eq!(filter_points(FilterKind::Future, &points, now()), vec![future]);
}

#[test]
fn boundaries_belong_to_present() {
    let starts_now = point(0, 2);
    let ends_now = point(-2, 0);
    assert!(matches(FilterKind::Present, &starts_now, now()));
    assert!(!matches(FilterKind::Future, &starts_now, now()));
    assert!(matches(FilterKind::Present, &ends_now, now()));
    assert!(!matches(FilterKind::Past, &ends_now, now()));
}

#[test]
fn exactly_one_time_filter_holds_for_well_formed_points() {
    for from in -4..=4 {
        for len in 0..=3 {
            let candidate = point(from, from + len);
            let hits = [FilterKind::Future, FilterKind::Present, FilterKind::Past]
                .into_iter()
                .filter(|kind| matches(*kind, &candidate, now()))
                .count();
            assert_eq!(hits, 1, "from={from} len={len}");
        }
    }
}

#[test]
fn filtering_preserves_input_order() {
    let a = point(1, 2);
    let b = point(3, 4);
    let c = point(2, 3);
    let filtered = filter_points(
        FilterKind::Future,
        &[c.clone(), a.clone(), b.clone()],
        now(),
    );
    assert_eq!(filtered, vec![c, a, b]);
}

#[test]
fn counts_cover_every_filter() {
    let points = vec![point(-5, -3), point(-4, -2), point(-1, 1), point(2, 4)];
    assert_eq!(
        filter_counts(&points, now()),
        vec![
            (FilterKind::Everything, 4),
            (FilterKind::Future, 1),
            (FilterKind::Present, 1),
            (FilterKind::Past, 2),
        ]
    );
}
