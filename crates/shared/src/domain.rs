use std::{collections::BTreeSet, fmt};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModelError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);
    };
}

id_newtype!(DestinationId);
id_newtype!(OfferId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(pub Uuid);

impl PointId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PointType {
    Taxi,
    Bus,
    Train,
    Ship,
    Drive,
    Flight,
    CheckIn,
    Sightseeing,
    Restaurant,
}

impl PointType {
    pub fn as_str(self) -> &'static str {
        match self {
            PointType::Taxi => "taxi",
            PointType::Bus => "bus",
            PointType::Train => "train",
            PointType::Ship => "ship",
            PointType::Drive => "drive",
            PointType::Flight => "flight",
            PointType::CheckIn => "check-in",
            PointType::Sightseeing => "sightseeing",
            PointType::Restaurant => "restaurant",
        }
    }
}

/// A scheduled stop on the trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub id: PointId,
    #[serde(rename = "type")]
    pub point_type: PointType,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub base_price: u32,
    pub destination: DestinationId,
    #[serde(default)]
    pub offers: BTreeSet<OfferId>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Point {
    pub fn duration(&self) -> Duration {
        self.date_to - self.date_from
    }

    pub fn is_well_formed(&self) -> bool {
        self.date_from <= self.date_to
    }
}

/// Returns true when an edit touches a field some sort kind orders by, so the
/// row may have to move and a per-row patch is not enough.
pub fn requires_reorder(before: &Point, after: &Point) -> bool {
    before.date_from != after.date_from
        || before.date_to != after.date_to
        || before.base_price != after.base_price
}

/// Contents of the creation form before it becomes a [`Point`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointDraft {
    pub point_type: PointType,
    pub date_from: DateTime<Utc>,
    pub date_to: DateTime<Utc>,
    pub base_price: u32,
    pub destination: Option<DestinationId>,
    pub offers: BTreeSet<OfferId>,
    pub is_favorite: bool,
}

impl PointDraft {
    pub fn blank(now: DateTime<Utc>) -> Self {
        Self {
            point_type: PointType::Flight,
            date_from: now,
            date_to: now,
            base_price: 0,
            destination: None,
            offers: BTreeSet::new(),
            is_favorite: false,
        }
    }

    pub fn into_point(self) -> Result<Point, ModelError> {
        let Some(destination) = self.destination else {
            return Err(ModelError::Validation("destination is required".into()));
        };
        if self.date_from > self.date_to {
            return Err(ModelError::Validation(
                "end time must not precede start time".into(),
            ));
        }
        Ok(Point {
            id: PointId::random(),
            point_type: self.point_type,
            date_from: self.date_from,
            date_to: self.date_to,
            base_price: self.base_price,
            destination,
            offers: self.offers,
            is_favorite: self.is_favorite,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub id: DestinationId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub price: u32,
}

/// Add-ons that can be booked for one point type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferGroup {
    #[serde(rename = "type")]
    pub point_type: PointType,
    pub offers: Vec<Offer>,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
