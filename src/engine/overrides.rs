//! Ручные правки после общего прогона: перенос на конкретное место и снятие места.
//!
//! Правка точечная: меняется только одно пожелание, остальные назначения,
//! свободные места и центры групп прогона не затрагиваются.

use super::error::AssignmentError;
use super::scoring::is_eligible;
use crate::models::{Preference, Seat};

/// Переносит пожелание `preference_id` на место `seat_id`.
///
/// `preferences` - все пожелания события, `seats` - все места его площадки.
/// Проверки идут в фиксированном порядке: пожелание, место, блокировка,
/// доступность, занятость другим участником. При ошибке ничего не меняется.
pub fn move_assignment<'p>(
    preferences: &'p mut [Preference],
    seats: &[Seat],
    preference_id: i64,
    seat_id: i64,
) -> Result<&'p Preference, AssignmentError> {
    let index = preferences
        .iter()
        .position(|p| p.id == preference_id)
        .ok_or(AssignmentError::PreferenceNotFound { preference_id })?;

    let seat = seats
        .iter()
        .find(|s| s.id == seat_id)
        .ok_or(AssignmentError::SeatNotFound { seat_id })?;

    check_move(&preferences[index], seat, preferences)?;

    preferences[index].assigned_seat_id = Some(seat_id);
    Ok(&preferences[index])
}

/// Проверяет, что `preference` можно посадить на `seat` при текущих назначениях события.
pub fn check_move(
    preference: &Preference,
    seat: &Seat,
    preferences: &[Preference],
) -> Result<(), AssignmentError> {
    if seat.is_blocked {
        return Err(AssignmentError::SeatBlocked { seat_id: seat.id });
    }
    if !is_eligible(preference, seat) {
        return Err(AssignmentError::AccessibleSeatRequired {
            preference_id: preference.id,
            seat_id: seat.id,
        });
    }
    if let Some(holder) = preferences
        .iter()
        .find(|p| p.id != preference.id && p.assigned_seat_id == Some(seat.id))
    {
        return Err(AssignmentError::SeatTaken {
            seat_id: seat.id,
            holder_id: holder.id,
        });
    }
    Ok(())
}

/// Снимает место с пожелания `preference_id`.
pub fn clear_assignment(
    preferences: &mut [Preference],
    preference_id: i64,
) -> Result<&Preference, AssignmentError> {
    let preference = preferences
        .iter_mut()
        .find(|p| p.id == preference_id)
        .ok_or(AssignmentError::PreferenceNotFound { preference_id })?;
    preference.assigned_seat_id = None;
    Ok(preference)
}
