use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Participant, Seat};

/// Кто сидит на месте.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatOccupant {
    pub preference_id: i64,
    pub member_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub needs_accessible: bool,
    pub group_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatmapEntry {
    #[serde(flatten)]
    pub seat: Seat,
    pub assignment: Option<SeatOccupant>,
}

/// Схема зала события: все места площадки с текущими назначениями.
///
/// Если место по ошибке занято несколькими участниками, показывается тот, у кого меньший id.
pub fn build_seatmap(seats: Vec<Seat>, participants: &[Participant]) -> Vec<SeatmapEntry> {
    let mut by_seat: HashMap<i64, &Participant> = HashMap::new();
    for p in participants {
        if let Some(seat_id) = p.assigned_seat_id {
            by_seat
                .entry(seat_id)
                .and_modify(|cur| {
                    if p.preference_id < cur.preference_id {
                        *cur = p;
                    }
                })
                .or_insert(p);
        }
    }

    seats
        .into_iter()
        .map(|seat| {
            let assignment = by_seat.get(&seat.id).map(|p| SeatOccupant {
                preference_id: p.preference_id,
                member_id: p.member_id,
                first_name: p.first_name.clone(),
                last_name: p.last_name.clone().unwrap_or_default(),
                needs_accessible: p.needs_accessible,
                group_code: p.group_code.clone(),
            });
            SeatmapEntry { seat, assignment }
        })
        .collect()
}
