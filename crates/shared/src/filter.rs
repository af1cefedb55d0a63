use chrono::{DateTime, Utc};

use crate::{domain::Point, protocol::FilterKind};

pub fn matches(kind: FilterKind, point: &Point, now: DateTime<Utc>) -> bool {
    match kind {
        FilterKind::Everything => true,
        FilterKind::Future => point.date_from > now,
        FilterKind::Present => point.date_from <= now && now <= point.date_to,
        FilterKind::Past => point.date_to < now,
    }
}

/// Keeps the points accepted by `kind`, in input order.
pub fn filter_points(kind: FilterKind, points: &[Point], now: DateTime<Utc>) -> Vec<Point> {
    points
        .iter()
        .filter(|point| matches(kind, point, now))
        .cloned()
        .collect()
}

/// Number of points each filter would show, in [`FilterKind::ALL`] order.
pub fn filter_counts(points: &[Point], now: DateTime<Utc>) -> Vec<(FilterKind, usize)> {
    FilterKind::ALL
        .into_iter()
        .map(|kind| {
            let count = points
                .iter()
                .filter(|point| matches(kind, point, now))
                .count();
            (kind, count)
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/filter_tests.rs"]
mod tests;
