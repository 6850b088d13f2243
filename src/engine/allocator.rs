//! Жадная рассадка.
//!
//! Прогон всегда пересобирает назначения с нуля:
//! 1. прежние места запоминаются как сигнал стабильности и обнуляются;
//! 2. сначала рассаживаются участники, которым нужно доступное место (по возрастанию id);
//! 3. затем все остальные, кто ещё без места (по возрастанию id);
//! 4. каждому достаётся свободное допустимое место с максимальной оценкой,
//!    при равенстве - место с меньшим id.
//!
//! Все структуры прогона живут только внутри одного вызова [`allocate`].

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::centroid::GroupCentroids;
use super::pool::SeatPool;
use super::scoring::{is_eligible, Scorer};
use super::weights::{Weights, WeightsUsed};
use crate::models::{Preference, Seat};

/// Итог прогона рассадки.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total: usize,
    pub assigned: usize,
    pub unassigned: usize,
    pub weights: WeightsUsed,
}

struct AllocationRun<'a> {
    pool: SeatPool<'a>,
    weights: Weights,
    free: BTreeSet<i64>,
    centroids: GroupCentroids,
    previous: HashMap<i64, Option<i64>>,
}

impl<'a> AllocationRun<'a> {
    fn new(seats: &'a [Seat], preferences: &[Preference], weights: Weights) -> Self {
        let pool = SeatPool::new(seats);
        let free = pool.ids().collect();
        let previous = preferences
            .iter()
            .map(|p| (p.id, p.assigned_seat_id))
            .collect();

        Self {
            pool,
            weights,
            free,
            centroids: GroupCentroids::new(),
            previous,
        }
    }

    fn best_seat(&self, preference: &Preference) -> Option<i64> {
        let scorer = Scorer {
            weights: self.weights,
            centroids: &self.centroids,
            span: self.pool.span(),
        };
        let previous = self.previous.get(&preference.id).copied().flatten();

        let mut best: Option<(i64, f64)> = None;
        // free упорядочен по id, поэтому строгое сравнение оставляет меньший id при равенстве
        for &seat_id in &self.free {
            let Some(seat) = self.pool.get(seat_id) else {
                continue;
            };
            if !is_eligible(preference, seat) {
                continue;
            }
            let score = scorer.total(preference, previous, seat);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((seat_id, score)),
            }
        }

        best.map(|(seat_id, _)| seat_id)
    }

    fn assign(&mut self, preference: &mut Preference) {
        if preference.assigned_seat_id.is_some() {
            return;
        }
        let Some(seat_id) = self.best_seat(preference) else {
            debug!(preference_id = preference.id, "no eligible free seat");
            return;
        };

        self.free.remove(&seat_id);
        preference.assigned_seat_id = Some(seat_id);

        if let (Some(group), Some(point)) = (
            preference.group(),
            self.pool.get(seat_id).and_then(Seat::point),
        ) {
            self.centroids.record(group, point);
            debug!(
                preference_id = preference.id,
                group,
                seated = self.centroids.members(group),
                "group centroid moved"
            );
        }
    }
}

/// Пересобирает назначения для всех `preferences` на местах `seats`.
///
/// `seats` - все места площадки (заблокированные отбрасываются здесь же),
/// `preferences` - все пожелания события; их `assigned_seat_id` на входе
/// трактуется как прежнее место и перезаписывается.
pub fn allocate(seats: &[Seat], preferences: &mut [Preference], weights: Weights) -> RunSummary {
    let mut run = AllocationRun::new(seats, preferences, weights);

    for p in preferences.iter_mut() {
        p.assigned_seat_id = None;
    }

    let mut order: Vec<usize> = (0..preferences.len()).collect();
    order.sort_by_key(|&i| preferences[i].id);

    for &i in &order {
        if preferences[i].needs_accessible {
            run.assign(&mut preferences[i]);
        }
    }
    for &i in &order {
        if preferences[i].assigned_seat_id.is_none() {
            run.assign(&mut preferences[i]);
        }
    }

    let total = preferences.len();
    let assigned = preferences.iter().filter(|p| p.assigned_seat_id.is_some()).count();

    RunSummary {
        total,
        assigned,
        unassigned: total - assigned,
        weights: weights.used(),
    }
}
