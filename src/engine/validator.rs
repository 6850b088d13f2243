//! Проверка сохранённой рассадки: только чтение, ничего не исправляет.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{Preference, Seat};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuesSummary {
    pub seat_conflicts: usize,
    pub blocked_assignments: usize,
    pub accessibility_violations: usize,
    pub unassigned: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConflict {
    pub seat_id: i64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatIssue {
    pub preference_id: i64,
    pub seat_id: i64,
    pub seat_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnassignedPreference {
    pub preference_id: i64,
    pub member_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuesReport {
    pub summary: IssuesSummary,
    pub seat_conflicts: Vec<SeatConflict>,
    pub blocked_assignments: Vec<SeatIssue>,
    pub accessibility_violations: Vec<SeatIssue>,
    pub unassigned: Vec<UnassignedPreference>,
}

impl IssuesReport {
    pub fn is_clean(&self) -> bool {
        self.summary == IssuesSummary::default()
    }
}

/// Собирает отчёт по пожеланиям одного события.
///
/// `seats` должен содержать места площадки вместе с заблокированными, а также все
/// места, на которые ссылаются назначения, даже с другой площадки.
/// Назначение на место, которого нет в `seats`, учитывается только в конфликтах.
pub fn collect_issues(preferences: &[Preference], seats: &[Seat]) -> IssuesReport {
    let seat_by_id: HashMap<i64, &Seat> = seats.iter().map(|s| (s.id, s)).collect();

    let mut ordered: Vec<&Preference> = preferences.iter().collect();
    ordered.sort_by_key(|p| p.id);

    let mut holders: BTreeMap<i64, usize> = BTreeMap::new();
    let mut blocked_assignments = Vec::new();
    let mut accessibility_violations = Vec::new();
    let mut unassigned = Vec::new();

    for p in ordered {
        let Some(seat_id) = p.assigned_seat_id else {
            unassigned.push(UnassignedPreference {
                preference_id: p.id,
                member_id: p.member_id,
            });
            continue;
        };

        *holders.entry(seat_id).or_default() += 1;

        let Some(seat) = seat_by_id.get(&seat_id) else {
            continue;
        };
        let issue = || SeatIssue {
            preference_id: p.id,
            seat_id,
            seat_code: seat.code.clone(),
        };
        if seat.is_blocked {
            blocked_assignments.push(issue());
        }
        if p.needs_accessible && !seat.is_accessible {
            accessibility_violations.push(issue());
        }
    }

    let seat_conflicts: Vec<SeatConflict> = holders
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(seat_id, count)| SeatConflict { seat_id, count })
        .collect();

    IssuesReport {
        summary: IssuesSummary {
            seat_conflicts: seat_conflicts.len(),
            blocked_assignments: blocked_assignments.len(),
            accessibility_violations: accessibility_violations.len(),
            unassigned: unassigned.len(),
        },
        seat_conflicts,
        blocked_assignments,
        accessibility_violations,
        unassigned,
    }
}
