//! Движок рассадки: чистые функции без ввода-вывода.
//!
//! - [`allocator`] - жадная пересборка назначений события;
//! - [`overrides`] - ручной перенос и снятие места;
//! - [`validator`] - отчёт о нарушениях в сохранённой рассадке.

pub mod allocator;
pub mod centroid;
pub mod error;
pub mod overrides;
pub mod pool;
pub mod scoring;
pub mod validator;
pub mod weights;

pub use allocator::{allocate, RunSummary};
pub use error::{AssignmentError, ErrorKind};
pub use overrides::{clear_assignment, move_assignment};
pub use validator::{collect_issues, IssuesReport};
pub use weights::{Weights, WeightsUsed};
