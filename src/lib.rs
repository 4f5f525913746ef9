pub mod error;
pub mod loan;
pub mod schedule;

pub use error::ScheduleError;
pub use loan::{Granularity, LoanParameters};
pub use schedule::{compute_schedule, schedule_iter, PeriodRecord, Schedule, ScheduleIter};
