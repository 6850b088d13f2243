pub mod event;
pub mod preference;
pub mod seat;

pub use event::{Event, EventStatus, EventSummary};
pub use preference::{Participant, Preference};
pub use seat::Seat;
