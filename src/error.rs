use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("invalid parameter: {field} {reason}")]
    InvalidParameter {
        field: &'static str,
        reason: &'static str,
    },

    #[error("schedule does not converge: balance {balance:.4} remaining after {periods} periods")]
    NonConvergent { periods: usize, balance: f64 },

    #[error("no calendar date follows {0}")]
    DateOutOfRange(NaiveDate),
}
