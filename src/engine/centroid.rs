use std::collections::HashMap;

/// Накопитель центров групп в рамках одного прогона.
///
/// Для каждого `group_code` хранится сумма координат уже рассаженных участников группы.
/// Порядок добавления важен: первые рассаженные задают центр для последующих.
#[derive(Debug, Default)]
pub struct GroupCentroids {
    groups: HashMap<String, Accumulator>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum_x: f64,
    sum_y: f64,
    count: usize,
}

impl GroupCentroids {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, group: &str, (x, y): (f64, f64)) {
        let acc = self.groups.entry(group.to_string()).or_default();
        acc.sum_x += x;
        acc.sum_y += y;
        acc.count += 1;
    }

    pub fn centroid(&self, group: &str) -> Option<(f64, f64)> {
        self.groups
            .get(group)
            .filter(|acc| acc.count > 0)
            .map(|acc| (acc.sum_x / acc.count as f64, acc.sum_y / acc.count as f64))
    }

    pub fn members(&self, group: &str) -> usize {
        self.groups.get(group).map_or(0, |acc| acc.count)
    }
}
