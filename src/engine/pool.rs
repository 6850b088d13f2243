use std::collections::BTreeMap;

use crate::models::Seat;

/// Назначаемые места площадки (без заблокированных), упорядоченные по id.
#[derive(Debug)]
pub struct SeatPool<'a> {
    seats: BTreeMap<i64, &'a Seat>,
    span: f64,
}

impl<'a> SeatPool<'a> {
    pub fn new(seats: &'a [Seat]) -> Self {
        let seats: BTreeMap<i64, &'a Seat> = seats
            .iter()
            .filter(|s| !s.is_blocked)
            .map(|s| (s.id, s))
            .collect();
        let span = coordinate_span(seats.values().copied());
        Self { seats, span }
    }

    pub fn get(&self, seat_id: i64) -> Option<&'a Seat> {
        self.seats.get(&seat_id).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.seats.keys().copied()
    }

    /// Диагональ габаритного прямоугольника координат; 1.0, если он вырожден.
    pub fn span(&self) -> f64 {
        self.span
    }
}

fn coordinate_span<'a>(seats: impl Iterator<Item = &'a Seat>) -> f64 {
    let mut x_range: Option<(f64, f64)> = None;
    let mut y_range: Option<(f64, f64)> = None;

    for seat in seats {
        if let Some(x) = seat.x {
            x_range = Some(widen(x_range, f64::from(x)));
        }
        if let Some(y) = seat.y {
            y_range = Some(widen(y_range, f64::from(y)));
        }
    }

    match (x_range, y_range) {
        (Some((min_x, max_x)), Some((min_y, max_y))) => {
            let diagonal = (max_x - min_x).hypot(max_y - min_y);
            if diagonal > 0.0 {
                diagonal
            } else {
                1.0
            }
        }
        _ => 1.0,
    }
}

fn widen(range: Option<(f64, f64)>, v: f64) -> (f64, f64) {
    match range {
        Some((lo, hi)) => (lo.min(v), hi.max(v)),
        None => (v, v),
    }
}
