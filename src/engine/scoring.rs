//! Оценка пары (пожелание, место).
//!
//! Итог - линейная свёртка трёх нормированных в [0, 1] сигналов:
//! совпадение с пожеланием, близость к центру группы и стабильность
//! (то же место, что и до пересборки).

use super::centroid::GroupCentroids;
use super::weights::Weights;
use crate::models::{Preference, Seat};

const SEAT_CODE_MATCH: f64 = 1.0;
const ZONE_MATCH: f64 = 0.5;
const AISLE_MATCH: f64 = 0.2;

/// Жёсткие ограничения: место не заблокировано и доступно, если это требуется.
pub fn is_eligible(preference: &Preference, seat: &Seat) -> bool {
    !seat.is_blocked && (!preference.needs_accessible || seat.is_accessible)
}

pub fn preference_score(preference: &Preference, seat: &Seat) -> f64 {
    if preference
        .preferred_seat_code
        .as_deref()
        .is_some_and(|code| !code.is_empty() && code == seat.code)
    {
        return SEAT_CODE_MATCH;
    }

    let mut score = 0.0;
    if let Some(zone) = preference.preferred_zone.as_deref().filter(|z| !z.is_empty()) {
        if seat.zone.as_deref() == Some(zone) {
            score += ZONE_MATCH;
        }
    }
    if preference.wants_aisle && seat.is_aisle {
        score += AISLE_MATCH;
    }
    score.min(1.0)
}

pub fn group_score(preference: &Preference, seat: &Seat, centroids: &GroupCentroids, span: f64) -> f64 {
    let Some(group) = preference.group() else {
        return 0.0;
    };
    let Some((cx, cy)) = centroids.centroid(group) else {
        return 0.0;
    };
    let Some((x, y)) = seat.point() else {
        return 0.0;
    };

    let span = if span > 0.0 { span } else { 1.0 };
    let distance = (x - cx).hypot(y - cy) / span;
    1.0 - distance.clamp(0.0, 1.0)
}

pub fn stability_score(previous_seat: Option<i64>, seat: &Seat) -> f64 {
    if previous_seat == Some(seat.id) {
        1.0
    } else {
        0.0
    }
}

/// Считает итоговую оценку в контексте текущего прогона.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    pub weights: Weights,
    pub centroids: &'a GroupCentroids,
    pub span: f64,
}

impl Scorer<'_> {
    pub fn total(&self, preference: &Preference, previous_seat: Option<i64>, seat: &Seat) -> f64 {
        self.weights.preference * preference_score(preference, seat)
            + self.weights.group * group_score(preference, seat, self.centroids, self.span)
            + self.weights.stability * stability_score(previous_seat, seat)
    }
}
