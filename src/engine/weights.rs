//! Веса целевой функции рассадки.
//!
//! Веса приходят в процентах (0..=100), зажимаются в этот диапазон и делятся на 100.
//! Отсутствующее или нечисловое значение заменяется значением по умолчанию.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PREFERENCE_WEIGHT: f64 = 60.0;
pub const DEFAULT_GROUP_WEIGHT: f64 = 70.0;
pub const DEFAULT_STABILITY_WEIGHT: f64 = 80.0;

const PREFERENCE_KEYS: [&str; 3] = ["preference_weight", "preferenceWeight", "preference"];
const GROUP_KEYS: [&str; 3] = ["group_weight", "groupWeight", "group"];
const STABILITY_KEYS: [&str; 3] = ["stability_weight", "stabilityWeight", "stability"];

/// Веса в долях от 0 до 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub preference: f64,
    pub group: f64,
    pub stability: f64,
}

/// Фактически использованные веса, целые проценты.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightsUsed {
    pub preference_weight: i64,
    pub group_weight: i64,
    pub stability_weight: i64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            preference: DEFAULT_PREFERENCE_WEIGHT / 100.0,
            group: DEFAULT_GROUP_WEIGHT / 100.0,
            stability: DEFAULT_STABILITY_WEIGHT / 100.0,
        }
    }
}

impl Weights {
    /// Собирает веса из процентов, зажимая каждый в [0, 100].
    pub fn from_percentages(preference: f64, group: f64, stability: f64) -> Self {
        Self {
            preference: clamp_percentage(preference, DEFAULT_PREFERENCE_WEIGHT),
            group: clamp_percentage(group, DEFAULT_GROUP_WEIGHT),
            stability: clamp_percentage(stability, DEFAULT_STABILITY_WEIGHT),
        }
    }

    /// Разбирает тело запроса запуска. `None` или не-объект дают веса по умолчанию.
    pub fn from_request(payload: Option<&Value>) -> Self {
        let lookup = |keys: &[&str], default: f64| -> f64 {
            payload
                .and_then(Value::as_object)
                .and_then(|obj| keys.iter().find_map(|k| obj.get(*k).and_then(numeric)))
                .map(|v| clamp_percentage(v, default))
                .unwrap_or(default / 100.0)
        };

        Self {
            preference: lookup(&PREFERENCE_KEYS, DEFAULT_PREFERENCE_WEIGHT),
            group: lookup(&GROUP_KEYS, DEFAULT_GROUP_WEIGHT),
            stability: lookup(&STABILITY_KEYS, DEFAULT_STABILITY_WEIGHT),
        }
    }

    /// Половины округляются к чётному: 42.5% -> 42.
    pub fn used(&self) -> WeightsUsed {
        WeightsUsed {
            preference_weight: (self.preference * 100.0).round_ties_even() as i64,
            group_weight: (self.group * 100.0).round_ties_even() as i64,
            stability_weight: (self.stability * 100.0).round_ties_even() as i64,
        }
    }
}

// Число или строка с числом; всё остальное (bool, null, NaN) не считается весом
fn numeric(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    v.is_finite().then_some(v)
}

fn clamp_percentage(value: f64, default: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0) / 100.0
    } else {
        default / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_payload_uses_defaults() {
        let w = Weights::from_request(None);
        assert_eq!(w, Weights::default());
        assert_eq!(
            w.used(),
            WeightsUsed { preference_weight: 60, group_weight: 70, stability_weight: 80 }
        );
    }

    #[test]
    fn values_are_clamped_into_percentage_range() {
        let payload = json!({ "preference_weight": 150, "group_weight": -5, "stability_weight": 42.4 });
        let used = Weights::from_request(Some(&payload)).used();
        assert_eq!(used.preference_weight, 100);
        assert_eq!(used.group_weight, 0);
        assert_eq!(used.stability_weight, 42);
    }

    #[test]
    fn reported_halves_round_to_even() {
        let used = Weights::from_percentages(0.5, 2.5, 42.5).used();
        assert_eq!(
            used,
            WeightsUsed { preference_weight: 0, group_weight: 2, stability_weight: 42 }
        );
    }

    #[test]
    fn camel_case_and_short_keys_are_accepted() {
        let payload = json!({ "preferenceWeight": "25", "group": 10 });
        let used = Weights::from_request(Some(&payload)).used();
        assert_eq!(used.preference_weight, 25);
        assert_eq!(used.group_weight, 10);
        assert_eq!(used.stability_weight, 80);
    }

    #[test]
    fn non_numeric_value_falls_through_to_next_key_then_default() {
        let payload = json!({ "preference_weight": "lots", "preferenceWeight": 30, "group_weight": true });
        let used = Weights::from_request(Some(&payload)).used();
        assert_eq!(used.preference_weight, 30);
        assert_eq!(used.group_weight, 70);
    }

    #[test]
    fn non_object_payload_is_ignored() {
        let payload = json!([1, 2, 3]);
        assert_eq!(Weights::from_request(Some(&payload)), Weights::default());
    }
}
