//! Authoritative state behind the trip board: the point collection and the
//! active filter. Both apply a mutation completely and only then notify their
//! observers, synchronously and in registration order.

use std::cell::{Cell, RefCell};

use shared::{
    domain::{Destination, DestinationId, Offer, OfferGroup, Point, PointId, PointType},
    error::ModelError,
    protocol::{FilterKind, UpdateKind},
};
use tracing::debug;

pub mod observer;

pub use observer::{Observers, Subscription};

pub struct PointsModel {
    points: RefCell<Vec<Point>>,
    destinations: Vec<Destination>,
    offers: Vec<OfferGroup>,
    observers: Observers<Point>,
}

impl PointsModel {
    pub fn new(points: Vec<Point>, destinations: Vec<Destination>, offers: Vec<OfferGroup>) -> Self {
        Self {
            points: RefCell::new(points),
            destinations,
            offers,
            observers: Observers::default(),
        }
    }

    /// Snapshot of the collection in storage order.
    pub fn points(&self) -> Vec<Point> {
        self.points.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.points.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.borrow().is_empty()
    }

    pub fn point(&self, id: PointId) -> Option<Point> {
        self.points.borrow().iter().find(|p| p.id == id).cloned()
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn destination(&self, id: DestinationId) -> Option<&Destination> {
        self.destinations.iter().find(|d| d.id == id)
    }

    pub fn offers_for(&self, point_type: PointType) -> &[Offer] {
        self.offers
            .iter()
            .find(|group| group.point_type == point_type)
            .map(|group| group.offers.as_slice())
            .unwrap_or_default()
    }

    pub fn add_observer(&self, callback: impl Fn(UpdateKind, &Point) + 'static) -> Subscription {
        self.observers.subscribe(callback)
    }

    pub fn update_point(&self, update: UpdateKind, point: Point) -> Result<(), ModelError> {
        ensure_well_formed(&point)?;
        {
            let mut points = self.points.borrow_mut();
            let slot = points
                .iter_mut()
                .find(|p| p.id == point.id)
                .ok_or(ModelError::NotFound(point.id))?;
            *slot = point.clone();
        }
        debug!(point_id = %point.id, ?update, "point updated");
        self.observers.notify(update, &point);
        Ok(())
    }

    /// Inserts at the head of the collection.
    pub fn add_point(&self, update: UpdateKind, point: Point) -> Result<(), ModelError> {
        ensure_well_formed(&point)?;
        {
            let mut points = self.points.borrow_mut();
            if points.iter().any(|p| p.id == point.id) {
                return Err(ModelError::Duplicate(point.id));
            }
            points.insert(0, point.clone());
        }
        debug!(point_id = %point.id, ?update, "point added");
        self.observers.notify(update, &point);
        Ok(())
    }

    pub fn delete_point(&self, update: UpdateKind, point: Point) -> Result<(), ModelError> {
        let removed = {
            let mut points = self.points.borrow_mut();
            let index = points
                .iter()
                .position(|p| p.id == point.id)
                .ok_or(ModelError::NotFound(point.id))?;
            points.remove(index)
        };
        debug!(point_id = %removed.id, ?update, "point deleted");
        self.observers.notify(update, &removed);
        Ok(())
    }
}

fn ensure_well_formed(point: &Point) -> Result<(), ModelError> {
    if point.is_well_formed() {
        Ok(())
    } else {
        Err(ModelError::Validation(format!(
            "point {} ends before it starts",
            point.id
        )))
    }
}

#[derive(Default)]
pub struct FilterModel {
    filter: Cell<FilterKind>,
    observers: Observers<FilterKind>,
}

impl FilterModel {
    pub fn new(filter: FilterKind) -> Self {
        Self {
            filter: Cell::new(filter),
            observers: Observers::default(),
        }
    }

    pub fn filter(&self) -> FilterKind {
        self.filter.get()
    }

    pub fn add_observer(
        &self,
        callback: impl Fn(UpdateKind, &FilterKind) + 'static,
    ) -> Subscription {
        self.observers.subscribe(callback)
    }

    /// Observers are notified even when `filter` is already active, so a
    /// MAJOR reset still reaches them.
    pub fn set_filter(&self, update: UpdateKind, filter: FilterKind) {
        self.filter.set(filter);
        debug!(%filter, ?update, "filter changed");
        self.observers.notify(update, &filter);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
