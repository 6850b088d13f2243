pub mod assignments;
pub mod seatmap;

pub use assignments::AssignmentService;
