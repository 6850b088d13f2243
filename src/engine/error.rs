/// Класс ошибки с точки зрения вызывающего.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    ConstraintViolation,
    Conflict,
}

/// Отказ ручной правки назначения.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentError {
    #[error("Preference {preference_id} not found for event")]
    PreferenceNotFound { preference_id: i64 },

    #[error("Seat {seat_id} not found for event venue")]
    SeatNotFound { seat_id: i64 },

    #[error("Seat {seat_id} is blocked")]
    SeatBlocked { seat_id: i64 },

    #[error("Member requires an accessible seat, seat {seat_id} is not accessible")]
    AccessibleSeatRequired { preference_id: i64, seat_id: i64 },

    #[error("Seat {seat_id} already assigned to preference {holder_id}")]
    SeatTaken { seat_id: i64, holder_id: i64 },
}

impl AssignmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssignmentError::PreferenceNotFound { .. } | AssignmentError::SeatNotFound { .. } => {
                ErrorKind::NotFound
            }
            AssignmentError::SeatBlocked { .. } | AssignmentError::AccessibleSeatRequired { .. } => {
                ErrorKind::ConstraintViolation
            }
            AssignmentError::SeatTaken { .. } => ErrorKind::Conflict,
        }
    }
}
