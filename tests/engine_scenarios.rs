//! Сценарии движка рассадки целиком: прогон, ручные правки и отчёт.

use proptest::prelude::*;
use seatflow::engine::{
    allocate, clear_assignment, collect_issues, move_assignment, AssignmentError, ErrorKind,
    Weights,
};
use seatflow::models::{Preference, Seat};

fn seat(id: i64) -> Seat {
    Seat {
        id,
        venue_id: 1,
        code: format!("A-{id}"),
        zone: Some("Main".into()),
        row_label: Some("A".into()),
        seat_number: Some(id.to_string()),
        x: Some(id as i32 * 10),
        y: Some(0),
        is_accessible: false,
        is_aisle: false,
        is_blocked: false,
    }
}

fn pref(id: i64) -> Preference {
    Preference {
        id,
        event_id: 1,
        member_id: 100 + id,
        ..Default::default()
    }
}

fn seat_of(prefs: &[Preference], id: i64) -> Option<i64> {
    prefs.iter().find(|p| p.id == id).and_then(|p| p.assigned_seat_id)
}

#[test]
fn accessible_member_gets_the_accessible_seat() {
    let seats = vec![Seat { is_accessible: true, ..seat(1) }, seat(2)];
    let mut prefs = vec![Preference { needs_accessible: true, ..pref(1) }, pref(2)];

    let summary = allocate(&seats, &mut prefs, Weights::default());

    assert_eq!(seat_of(&prefs, 1), Some(1));
    assert_eq!(seat_of(&prefs, 2), Some(2));
    assert_eq!((summary.total, summary.assigned, summary.unassigned), (2, 2, 0));
    assert_eq!(summary.weights.preference_weight, 60);
    assert_eq!(summary.weights.group_weight, 70);
    assert_eq!(summary.weights.stability_weight, 80);
}

#[test]
fn one_seat_two_members_leaves_one_unassigned() {
    let seats = vec![seat(1)];
    let mut prefs = vec![pref(1), pref(2)];

    let summary = allocate(&seats, &mut prefs, Weights::default());
    assert_eq!((summary.assigned, summary.unassigned), (1, 1));

    let report = collect_issues(&prefs, &seats);
    assert_eq!(report.summary.unassigned, 1);
    assert_eq!(report.unassigned[0].preference_id, 2);
    assert_eq!(report.summary.seat_conflicts, 0);
}

#[test]
fn moving_onto_a_held_seat_is_rejected_without_changes() {
    let seats = vec![seat(1), seat(2)];
    let mut prefs = vec![pref(1), pref(2)];
    allocate(&seats, &mut prefs, Weights::default());
    let before = prefs.clone();

    let held_by_b = seat_of(&prefs, 2).unwrap();
    let err = move_assignment(&mut prefs, &seats, 1, held_by_b).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err, AssignmentError::SeatTaken { seat_id: held_by_b, holder_id: 2 });
    assert_eq!(prefs, before);
}

#[test]
fn clear_then_move_round_trip_through_the_report() {
    let seats = vec![seat(1), seat(2), seat(3)];
    let mut prefs = vec![pref(1), pref(2)];
    allocate(&seats, &mut prefs, Weights::default());

    clear_assignment(&mut prefs, 1).unwrap();
    let report = collect_issues(&prefs, &seats);
    assert_eq!(report.unassigned.len(), 1);
    assert_eq!(report.unassigned[0].preference_id, 1);

    move_assignment(&mut prefs, &seats, 1, 3).unwrap();
    let report = collect_issues(&prefs, &seats);
    assert!(report.unassigned.is_empty());
    assert!(report.seat_conflicts.is_empty());
    assert_eq!(seat_of(&prefs, 1), Some(3));
}

#[test]
fn seat_blocked_after_assignment_shows_up_in_report() {
    let mut seats = vec![seat(1)];
    let mut prefs = vec![pref(1)];
    allocate(&seats, &mut prefs, Weights::default());

    seats[0].is_blocked = true;
    let report = collect_issues(&prefs, &seats);
    assert_eq!(report.summary.blocked_assignments, 1);

    // следующий прогон снимает место
    let summary = allocate(&seats, &mut prefs, Weights::default());
    assert_eq!(summary.unassigned, 1);
    assert!(collect_issues(&prefs, &seats).blocked_assignments.is_empty());
}

#[test]
fn equal_scores_pick_the_lower_seat_id() {
    // без координат групповая часть одинакова для всех мест
    let seats: Vec<Seat> = [9, 4, 6]
        .into_iter()
        .map(|id| Seat { x: None, y: None, ..seat(id) })
        .collect();
    let mut prefs = vec![pref(1)];

    allocate(&seats, &mut prefs, Weights::default());
    assert_eq!(seat_of(&prefs, 1), Some(4));
}

#[test]
fn weights_from_request_are_reported_back() {
    let payload = serde_json::json!({ "preferenceWeight": 150, "group": "25", "stability_weight": true });
    let seats = vec![seat(1)];
    let mut prefs = vec![pref(1)];

    let summary = allocate(&seats, &mut prefs, Weights::from_request(Some(&payload)));

    assert_eq!(summary.weights.preference_weight, 100);
    assert_eq!(summary.weights.group_weight, 25);
    assert_eq!(summary.weights.stability_weight, 80);
}

// ---------------------------------------------------------------------------
// Свойства на случайных залах
// ---------------------------------------------------------------------------

fn arb_seats() -> impl Strategy<Value = Vec<Seat>> {
    prop::collection::vec(
        (
            any::<bool>(),
            any::<bool>(),
            prop::bool::weighted(0.15),
            prop::option::of((0i32..40, 0i32..40)),
            0usize..3,
        ),
        0..14,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (accessible, aisle, blocked, point, zone))| {
                let id = i as i64 + 1;
                Seat {
                    zone: Some(["Main", "Balcony", "Box"][zone].to_string()),
                    x: point.map(|p| p.0),
                    y: point.map(|p| p.1),
                    is_accessible: accessible,
                    is_aisle: aisle,
                    is_blocked: blocked,
                    ..seat(id)
                }
            })
            .collect()
    })
}

fn arb_prefs() -> impl Strategy<Value = Vec<Preference>> {
    prop::collection::vec(
        (
            prop::bool::weighted(0.3),
            any::<bool>(),
            prop::option::of(0usize..3),
            prop::option::of(0usize..3),
            prop::option::of(1i64..16),
        ),
        0..16,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (accessible, aisle, zone, group, previous))| Preference {
                needs_accessible: accessible,
                wants_aisle: aisle,
                preferred_zone: zone.map(|z| ["Main", "Balcony", "Box"][z].to_string()),
                group_code: group.map(|g| format!("g{g}")),
                assigned_seat_id: previous,
                ..pref(i as i64 + 1)
            })
            .collect()
    })
}

fn arb_weights() -> impl Strategy<Value = Weights> {
    (0.0f64..=100.0, 0.0f64..=100.0, 0.0f64..=100.0)
        .prop_map(|(p, g, s)| Weights::from_percentages(p, g, s))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_run_is_deterministic(seats in arb_seats(), prefs in arb_prefs(), weights in arb_weights()) {
        let mut first = prefs.clone();
        let mut second = prefs;
        let a = allocate(&seats, &mut first, weights);
        let b = allocate(&seats, &mut second, weights);
        prop_assert_eq!(a, b);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_run_respects_hard_constraints(seats in arb_seats(), mut prefs in arb_prefs(), weights in arb_weights()) {
        allocate(&seats, &mut prefs, weights);
        let report = collect_issues(&prefs, &seats);
        prop_assert!(report.seat_conflicts.is_empty());
        prop_assert!(report.blocked_assignments.is_empty());
        prop_assert!(report.accessibility_violations.is_empty());
    }

    #[test]
    fn prop_moves_never_double_book(
        seats in arb_seats(),
        mut prefs in arb_prefs(),
        moves in prop::collection::vec((1i64..16, 1i64..16), 0..20),
    ) {
        allocate(&seats, &mut prefs, Weights::default());
        for (preference_id, seat_id) in moves {
            let before = prefs.clone();
            if move_assignment(&mut prefs, &seats, preference_id, seat_id).is_err() {
                prop_assert_eq!(&prefs, &before);
            }
        }
        let report = collect_issues(&prefs, &seats);
        prop_assert!(report.seat_conflicts.is_empty());
        prop_assert!(report.blocked_assignments.is_empty());
        prop_assert!(report.accessibility_violations.is_empty());
    }

    #[test]
    fn prop_accessible_members_are_seated_first(
        accessible_seats in 1usize..6,
        other_seats in 0usize..6,
        needing in 0usize..6,
        others in 0usize..8,
    ) {
        let needing = needing.min(accessible_seats);
        let seats: Vec<Seat> = (1..=(accessible_seats + other_seats) as i64)
            .map(|id| Seat { is_accessible: id as usize <= accessible_seats, ..seat(id) })
            .collect();
        // участники без требований идут первыми по id
        let mut prefs: Vec<Preference> = (1..=others as i64).map(pref).collect();
        prefs.extend(
            (1..=needing as i64).map(|i| Preference { needs_accessible: true, ..pref(100 + i) }),
        );

        allocate(&seats, &mut prefs, Weights::default());

        for p in prefs.iter().filter(|p| p.needs_accessible) {
            let seat_id = p.assigned_seat_id;
            prop_assert!(seat_id.is_some());
            prop_assert!((seat_id.unwrap() as usize) <= accessible_seats);
        }
    }
}
