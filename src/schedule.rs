//! The amortization engine.
//!
//! A schedule is produced one period at a time by [`ScheduleIter`]: interest accrues on the
//! opening balance, whatever payments fall due in the period are applied (clipped so the
//! balance never goes below zero) and the iterator stops once the balance is cleared.
//! The number of periods is capped; a loan that is still outstanding at the cap yields
//! [`ScheduleError::NonConvergent`] instead of looping forever.

use crate::error::ScheduleError;
use crate::loan::{Granularity, LoanParameters};
use chrono::{Datelike, Days, Months, NaiveDate};
use log::{debug, trace, warn};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeriodRecord {
    pub period_number: usize,
    pub date: NaiveDate,
    pub start_balance: f64,
    pub interest_accrued: f64,
    pub payment_applied: f64,
    pub end_balance: f64,
}

impl fmt::Display for PeriodRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "period {}, date {}, start balance ${:.4}, interest ${:.4}, payment ${:.4}, end balance ${:.4}",
            self.period_number,
            self.date,
            self.start_balance,
            self.interest_accrued,
            self.payment_applied,
            self.end_balance
        )
    }
}

/// Lazily simulates a loan period by period.
#[derive(Clone, Debug)]
pub struct ScheduleIter {
    params: LoanParameters,
    period_rate: f64,
    balance: f64,
    date: NaiveDate,
    periods: usize,
    max_periods: usize,
    finished: bool,
}

impl ScheduleIter {
    fn new(params: &LoanParameters) -> Self {
        let period_rate = match params.granularity {
            Granularity::Monthly => params.monthly_rate(),
            Granularity::Daily => params.daily_rate(),
        };
        Self {
            params: params.clone(),
            period_rate,
            balance: params.principal,
            date: params.start_date,
            periods: 0,
            max_periods: params.granularity.max_periods(),
            finished: false,
        }
    }

    /// Overrides the number of periods simulated before giving up on the loan.
    pub fn with_max_periods(mut self, max_periods: usize) -> Self {
        self.max_periods = max_periods;
        self
    }

    /// Runs the simulation to the end.
    pub fn into_schedule(self) -> Result<Schedule, ScheduleError> {
        let granularity = self.params.granularity;
        let records = self.collect::<Result<Vec<_>, _>>()?;
        Ok(Schedule {
            granularity,
            records,
        })
    }

    // each period follows the previous one, so a day clamped at month end stays clamped
    fn next_date(&self) -> Result<NaiveDate, ScheduleError> {
        let date = match self.params.granularity {
            Granularity::Monthly => self.date.checked_add_months(Months::new(1)),
            Granularity::Daily => self.date.checked_add_days(Days::new(1)),
        };
        date.ok_or(ScheduleError::DateOutOfRange(self.date))
    }

    // the regular payment is owed every period in monthly mode; daily mode needs its trigger day
    fn payment_due(&self, date: &NaiveDate) -> f64 {
        let day = date.day();
        let mut payment = match self.params.granularity {
            Granularity::Monthly => self.params.regular_payment,
            Granularity::Daily if day == self.params.payment_day => self.params.regular_payment,
            Granularity::Daily => 0.,
        };
        if day == self.params.overpayment_day {
            payment += self.params.overpayment;
        }
        payment
    }
}

impl Iterator for ScheduleIter {
    type Item = Result<PeriodRecord, ScheduleError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.balance <= 0. {
            return None;
        }

        if self.periods >= self.max_periods {
            self.finished = true;
            warn!(
                "balance {:.4} still outstanding after {} periods",
                self.balance, self.periods
            );
            return Some(Err(ScheduleError::NonConvergent {
                periods: self.periods,
                balance: self.balance,
            }));
        }

        if self.periods > 0 {
            match self.next_date() {
                Ok(date) => self.date = date,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
        let date = self.date;

        let start_balance = self.balance;
        let interest = start_balance * self.period_rate;
        let owed = start_balance + interest;
        // clip so the final period clears the balance exactly
        let payment = self.payment_due(&date).min(owed);
        let end_balance = owed - payment;

        self.periods += 1;
        self.balance = end_balance;
        trace!(
            "period {}, date {}, interest {}, payment {}, end bal {}",
            self.periods,
            date,
            interest,
            payment,
            end_balance
        );

        Some(Ok(PeriodRecord {
            period_number: self.periods,
            date,
            start_balance,
            interest_accrued: interest,
            payment_applied: payment,
            end_balance,
        }))
    }
}

/// Starts a lazy simulation of `params`, rejecting parameters that fail validation.
pub fn schedule_iter(params: &LoanParameters) -> Result<ScheduleIter, ScheduleError> {
    params.validate()?;
    Ok(ScheduleIter::new(params))
}

pub fn compute_schedule(params: &LoanParameters) -> Result<Schedule, ScheduleError> {
    debug!("computing schedule: {}", params);
    let schedule = schedule_iter(params)?.into_schedule()?;
    debug!(
        "schedule complete: {} periods, paid off {:?}",
        schedule.len(),
        schedule.payoff_date()
    );
    Ok(schedule)
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Schedule {
    granularity: Granularity,
    records: Vec<PeriodRecord>,
}

impl Schedule {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn records(&self) -> &[PeriodRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for a 1-based period number.
    pub fn period(&self, period_number: usize) -> Option<&PeriodRecord> {
        period_number
            .checked_sub(1)
            .and_then(|index| self.records.get(index))
    }

    pub fn period_info(&self, period_number: usize) -> String {
        match self.period(period_number) {
            Some(record) => record.to_string(),
            None => "No period information.".to_string(),
        }
    }

    pub fn final_period(&self) -> Option<&PeriodRecord> {
        self.records.last()
    }

    pub fn payoff_date(&self) -> Option<NaiveDate> {
        self.final_period().map(|record| record.date)
    }

    pub fn total_interest(&self) -> f64 {
        self.records.iter().map(|r| r.interest_accrued).sum()
    }

    pub fn total_paid(&self) -> f64 {
        self.records.iter().map(|r| r.payment_applied).sum()
    }

    pub fn show_schedule(&self) {
        for record in &self.records {
            println!("{}", record);
        }
    }
}

impl IntoIterator for Schedule {
    type Item = PeriodRecord;
    type IntoIter = std::vec::IntoIter<PeriodRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a PeriodRecord;
    type IntoIter = std::slice::Iter<'a, PeriodRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
