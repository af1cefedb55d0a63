use super::*;

use std::rc::Rc;

use board::{MemoryHost, Mode};
use chrono::{TimeZone, Utc};
use shared::time::FixedClock;

use crate::seed::parse_seed;

const SEED: &str = r#"{
    "points": [
        {
            "id": "00000000-0000-4000-8000-000000000001",
            "type": "flight",
            "date_from": "2024-06-01T08:00:00Z",
            "date_to": "2024-06-01T11:00:00Z",
            "base_price": 400,
            "destination": 1
        },
        {
            "id": "00000000-0000-4000-8000-000000000002",
            "type": "check-in",
            "date_from": "2024-06-01T14:00:00Z",
            "date_to": "2024-06-05T10:00:00Z",
            "base_price": 900,
            "destination": 1,
            "offers": [2],
            "is_favorite": true
        }
    ],
    "destinations": [
        { "id": 1, "name": "Lisbon", "description": "Hills and trams" }
    ],
    "offers": [
        { "type": "check-in", "offers": [ { "id": 2, "title": "Breakfast", "price": 20 } ] }
    ]
}"#;

fn first() -> PointId {
    serde_json::from_str("\"00000000-0000-4000-8000-000000000001\"").expect("valid id")
}

fn board() -> (BoardPresenter<MemoryHost>, Rc<models::PointsModel>, Rc<FilterModel>) {
    let seed = parse_seed(SEED).expect("seed");
    let points = Rc::new(seed.into_model());
    let filter = Rc::new(FilterModel::default());
    let now = Utc
        .with_ymd_and_hms(2024, 6, 2, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    let board = BoardPresenter::new(
        MemoryHost::new(),
        Rc::clone(&points),
        Rc::clone(&filter),
        Rc::new(FixedClock(now)),
        || {},
    );
    board.init();
    (board, points, filter)
}

#[test]
fn parses_tagged_steps() {
    let steps = parse_script(
        r#"[
            {"op": "filter", "filter": "past"},
            {"op": "sort", "sort": "price"},
            {"op": "create"},
            {"op": "draft", "destination": 1, "type": "taxi", "hours": 2},
            {"op": "submit_new"}
        ]"#,
    )
    .expect("script");

    assert_eq!(
        steps[0],
        Step::Filter {
            filter: FilterKind::Past
        }
    );
    assert_eq!(steps[2], Step::Create);
    assert_eq!(
        steps[3],
        Step::Draft {
            destination: Some(DestinationId(1)),
            point_type: Some(PointType::Taxi),
            price: None,
            hours: Some(2),
        }
    );
    assert_eq!(steps[4], Step::SubmitNew);
}

#[test]
fn rejects_unknown_ops() {
    assert!(parse_script(r#"[{"op": "archive"}]"#).is_err());
}

#[test]
fn filter_step_shows_empty_state_text() {
    let (board, _, filter) = board();
    apply_step(
        &board,
        &filter,
        &Step::Filter {
            filter: FilterKind::Future,
        },
    )
    .expect("filter");
    assert_eq!(
        board.host().render_text(),
        "There are no future events now\n"
    );
}

#[test]
fn edit_and_submit_price_through_steps() {
    let (board, points, filter) = board();
    let id = first();

    apply_step(&board, &filter, &Step::Edit { point: id }).expect("edit");
    assert_eq!(board.presenter_mode(id), Some(Mode::Editing));

    apply_step(
        &board,
        &filter,
        &Step::Submit {
            point: id,
            price: Some(1200),
            favorite: None,
        },
    )
    .expect("submit");

    assert_eq!(points.point(id).map(|p| p.base_price), Some(1200));
    assert_eq!(board.editing(), None);
}

#[test]
fn replay_counts_refused_steps_and_continues() {
    let (board, points, filter) = board();
    let steps = vec![
        Step::Create,
        Step::SubmitNew,
        Step::Draft {
            destination: Some(DestinationId(1)),
            point_type: Some(PointType::Bus),
            price: Some(15),
            hours: Some(1),
        },
        Step::SubmitNew,
        Step::Delete { point: first() },
    ];

    let mut seen = Vec::new();
    let refused = replay(&board, &filter, &steps, |index, _| seen.push(index));

    assert_eq!(refused, 1);
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    assert_eq!(points.len(), 2);
    assert!(points.point(first()).is_none());
    assert!(!board.is_creating());
}

#[test]
fn rendered_board_lists_cards_with_offers_and_favorites() {
    let (board, _, _) = board();
    let text = board.host().render_text();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "sort: [day] time price");
    assert_eq!(lines[1], "  Jun 01 08:00-11:00 flight Lisbon $400");
    assert_eq!(
        lines[2],
        "  Jun 01 14:00-10:00 check-in Lisbon $900 +Breakfast $20 *"
    );
}

#[test]
fn draft_with_unrepresentable_hours_is_refused() {
    let (board, _, filter) = board();
    let steps = parse_script(
        r#"[
            {"op": "create"},
            {"op": "draft", "destination": 1, "hours": 9000000000000000}
        ]"#,
    )
    .expect("script");

    let refused = replay(&board, &filter, &steps, |_, _| {});

    assert_eq!(refused, 1);
    assert!(board.is_creating());
    let draft = board.new_point_draft().expect("form stays open");
    assert_eq!(draft.destination, None);
    assert_eq!(draft.date_to, draft.date_from);
}
