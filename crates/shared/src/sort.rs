use std::cmp::Ordering;

use crate::{domain::Point, protocol::SortKind};

/// Total order for `kind`. Equal keys compare `Equal` so that a stable sort
/// keeps their input order.
pub fn compare(kind: SortKind, a: &Point, b: &Point) -> Ordering {
    match kind {
        SortKind::Default => a.date_from.cmp(&b.date_from),
        SortKind::Time => b.duration().cmp(&a.duration()),
        SortKind::Price => b.base_price.cmp(&a.base_price),
    }
}

pub fn sort_points(kind: SortKind, points: &mut [Point]) {
    points.sort_by(|a, b| compare(kind, a, b));
}

#[cfg(test)]
#[path = "tests/sort_tests.rs"]
mod tests;
