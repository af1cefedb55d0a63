//! Scripted user interactions replayed against a board.

use anyhow::Context;
use board::{BoardPresenter, ViewHost};
use chrono::Duration;
use models::FilterModel;
use serde::Deserialize;
use shared::{
    domain::{DestinationId, PointId, PointType},
    error::ModelError,
    protocol::{FilterKind, SortKind, UpdateKind},
};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Filter {
        filter: FilterKind,
    },
    Sort {
        sort: SortKind,
    },
    Edit {
        point: PointId,
    },
    Cancel {
        point: PointId,
    },
    Submit {
        point: PointId,
        #[serde(default)]
        price: Option<u32>,
        #[serde(default)]
        favorite: Option<bool>,
    },
    Favorite {
        point: PointId,
    },
    Delete {
        point: PointId,
    },
    Create,
    Draft {
        #[serde(default)]
        destination: Option<DestinationId>,
        #[serde(default, rename = "type")]
        point_type: Option<PointType>,
        #[serde(default)]
        price: Option<u32>,
        #[serde(default)]
        hours: Option<i64>,
    },
    SubmitNew,
    CancelNew,
}

pub fn parse_script(raw: &str) -> anyhow::Result<Vec<Step>> {
    serde_json::from_str(raw).context("script must be a JSON array of steps")
}

/// Applies one step. Filter switches go through the filter model the same way
/// the filter bar would; everything else goes through the board.
pub fn apply_step<H: ViewHost + 'static>(
    board: &BoardPresenter<H>,
    filter_model: &FilterModel,
    step: &Step,
) -> Result<(), ModelError> {
    match step {
        Step::Filter { filter } => filter_model.set_filter(UpdateKind::Major, *filter),
        Step::Sort { sort } => board.sort_changed(*sort),
        Step::Edit { point } => {
            if !board.edit_point(*point) {
                info!(point_id = %point, "edit request had no effect");
            }
        }
        Step::Cancel { point } => board.cancel_edit(*point),
        Step::Submit {
            point,
            price,
            favorite,
        } => {
            let Some(mut updated) = board.points().into_iter().find(|p| p.id == *point) else {
                return Err(ModelError::NotFound(*point));
            };
            if let Some(price) = price {
                updated.base_price = *price;
            }
            if let Some(favorite) = favorite {
                updated.is_favorite = *favorite;
            }
            board.submit_point(*point, updated)?;
        }
        Step::Favorite { point } => board.toggle_favorite(*point)?,
        Step::Delete { point } => board.delete_point(*point)?,
        Step::Create => board.create_point(),
        Step::Draft {
            destination,
            point_type,
            price,
            hours,
        } => {
            let date_to = match (hours, board.new_point_draft()) {
                (Some(hours), Some(draft)) => Some(
                    Duration::try_hours(*hours)
                        .and_then(|span| draft.date_from.checked_add_signed(span))
                        .ok_or_else(|| ModelError::Validation("hours out of range".into()))?,
                ),
                _ => None,
            };
            board.edit_new_point(|draft| {
                if let Some(destination) = destination {
                    draft.destination = Some(*destination);
                }
                if let Some(point_type) = point_type {
                    draft.point_type = *point_type;
                }
                if let Some(price) = price {
                    draft.base_price = *price;
                }
                if let Some(date_to) = date_to {
                    draft.date_to = date_to;
                }
            });
        }
        Step::SubmitNew => board.submit_new_point()?,
        Step::CancelNew => board.cancel_new_point(),
    }
    Ok(())
}

/// Replays `steps` in order. A refused step is logged and the replay goes on,
/// as it would for a user whose edit was rejected. Returns the number of
/// refused steps.
pub fn replay<H: ViewHost + 'static>(
    board: &BoardPresenter<H>,
    filter_model: &FilterModel,
    steps: &[Step],
    mut after_step: impl FnMut(usize, &Step),
) -> usize {
    let mut refused = 0;
    for (index, step) in steps.iter().enumerate() {
        if let Err(err) = apply_step(board, filter_model, step) {
            warn!(step = index, ?step, error = %err, "step refused");
            refused += 1;
        }
        after_step(index, step);
    }
    refused
}

#[cfg(test)]
#[path = "tests/script_tests.rs"]
mod tests;
