//! Contracts shared by the models and the board: notification granularity,
//! user actions and the selection kinds.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{domain::Point, error::ParseKindError};

/// Scope of a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    /// One record's non-structural fields changed.
    Patch,
    /// List membership or order changed.
    Minor,
    /// Selection context changed; sort is reset as well.
    Major,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    UpdatePoint,
    AddPoint,
    DeletePoint,
}

/// A user action raised by a presenter, to be applied to the collection model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewAction {
    pub action: UserAction,
    pub update: UpdateKind,
    pub point: Point,
}

impl ViewAction {
    pub fn new(action: UserAction, update: UpdateKind, point: Point) -> Self {
        Self {
            action,
            update,
            point,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    #[default]
    Everything,
    Future,
    Present,
    Past,
}

impl FilterKind {
    pub const ALL: [FilterKind; 4] = [
        FilterKind::Everything,
        FilterKind::Future,
        FilterKind::Present,
        FilterKind::Past,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FilterKind::Everything => "everything",
            FilterKind::Future => "future",
            FilterKind::Present => "present",
            FilterKind::Past => "past",
        }
    }

    /// Text of the empty-state view when this filter leaves nothing to show.
    pub fn empty_message(self) -> &'static str {
        match self {
            FilterKind::Everything => "Click New Event to create your first point",
            FilterKind::Future => "There are no future events now",
            FilterKind::Present => "There are no present events now",
            FilterKind::Past => "There are no past events now",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseKindError::new("filter", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKind {
    /// Start time, earliest first.
    #[default]
    Default,
    /// Duration, longest first.
    Time,
    /// Base price, most expensive first.
    Price,
}

impl SortKind {
    pub const ALL: [SortKind; 3] = [SortKind::Default, SortKind::Time, SortKind::Price];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKind::Default => "day",
            SortKind::Time => "time",
            SortKind::Price => "price",
        }
    }
}

impl fmt::Display for SortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("default") {
            return Ok(SortKind::Default);
        }
        SortKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseKindError::new("sort", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_filter_kinds_case_insensitively() {
        assert_eq!("Past".parse::<FilterKind>(), Ok(FilterKind::Past));
        assert_eq!(" future ".parse::<FilterKind>(), Ok(FilterKind::Future));
        assert!("archived".parse::<FilterKind>().is_err());
    }

    #[test]
    fn parses_sort_kinds_and_rejects_unsupported_columns() {
        assert_eq!("day".parse::<SortKind>(), Ok(SortKind::Default));
        assert_eq!("default".parse::<SortKind>(), Ok(SortKind::Default));
        assert_eq!("price".parse::<SortKind>(), Ok(SortKind::Price));
        let err = "offers".parse::<SortKind>().expect_err("offers is not sortable");
        assert_eq!(err.to_string(), "unknown sort 'offers'");
        assert!("event".parse::<SortKind>().is_err());
    }

    #[test]
    fn defaults_are_everything_and_day() {
        assert_eq!(FilterKind::default(), FilterKind::Everything);
        assert_eq!(SortKind::default(), SortKind::Default);
    }

    #[test]
    fn empty_messages_name_the_filter() {
        assert!(FilterKind::Past.empty_message().contains("past"));
        assert!(FilterKind::Future.empty_message().contains("future"));
        assert!(FilterKind::Present.empty_message().contains("present"));
    }
}
