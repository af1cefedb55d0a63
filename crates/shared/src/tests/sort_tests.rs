use super::*;

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::{DestinationId, PointId, PointType};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn point(start_hour: i64, hours: i64, price: u32) -> Point {
    Point {
        id: PointId::random(),
        point_type: PointType::Ship,
        date_from: base() + Duration::hours(start_hour),
        date_to: base() + Duration::hours(start_hour + hours),
        base_price: price,
        destination: DestinationId(1),
        offers: BTreeSet::new(),
        is_favorite: false,
    }
}

fn ids(points: &[Point]) -> Vec<PointId> {
    points.iter().map(|p| p.id).collect()
}

#[test]
fn default_sorts_by_start_ascending() {
    let late = point(9, 1, 10);
    let early = point(1, 1, 10);
    let middle = point(5, 1, 10);
    let mut points = vec![late.clone(), early.clone(), middle.clone()];
    sort_points(SortKind::Default, &mut points);
    assert_eq!(ids(&points), vec![early.id, middle.id, late.id]);
}

#[test]
fn time_sorts_longest_first() {
    let short = point(0, 1, 10);
    let long = point(0, 5, 10);
    let medium = point(0, 3, 10);
    let mut points = vec![short.clone(), long.clone(), medium.clone()];
    sort_points(SortKind::Time, &mut points);
    assert_eq!(ids(&points), vec![long.id, medium.id, short.id]);
}

#[test]
fn price_sorts_most_expensive_first() {
    let cheap = point(0, 1, 20);
    let pricey = point(1, 1, 900);
    let mid = point(2, 1, 150);
    let mut points = vec![cheap.clone(), pricey.clone(), mid.clone()];
    sort_points(SortKind::Price, &mut points);
    assert_eq!(ids(&points), vec![pricey.id, mid.id, cheap.id]);
}

#[test]
fn equal_keys_keep_input_order() {
    let a = point(0, 2, 50);
    let b = point(3, 2, 50);
    let c = point(6, 2, 50);
    let input = vec![c.clone(), a.clone(), b.clone()];

    for kind in [SortKind::Time, SortKind::Price] {
        let mut points = input.clone();
        sort_points(kind, &mut points);
        assert_eq!(ids(&points), ids(&input), "kind={kind}");
    }
}

#[test]
fn time_then_default_restores_start_order_for_equal_starts() {
    let a = point(2, 1, 10);
    let b = point(2, 4, 10);
    let c = point(0, 2, 10);
    let d = point(2, 2, 10);
    let mut points = vec![a.clone(), b.clone(), c.clone(), d.clone()];

    sort_points(SortKind::Time, &mut points);
    assert_eq!(ids(&points), vec![b.id, c.id, d.id, a.id]);

    sort_points(SortKind::Default, &mut points);
    // a, b and d share a start; they keep the order the time sort left them in.
    assert_eq!(ids(&points), vec![c.id, b.id, d.id, a.id]);
}

#[test]
fn resorting_the_source_by_default_ignores_an_earlier_time_sort() {
    let a = point(2, 1, 10);
    let b = point(2, 4, 10);
    let c = point(0, 2, 10);
    let source = vec![a.clone(), b.clone(), c.clone()];

    let mut by_time = source.clone();
    sort_points(SortKind::Time, &mut by_time);
    assert_eq!(ids(&by_time), vec![b.id, c.id, a.id]);

    let mut by_default = source;
    sort_points(SortKind::Default, &mut by_default);
    assert_eq!(ids(&by_default), vec![c.id, a.id, b.id]);
}
