use crate::error::ScheduleError;
use chrono::NaiveDate;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Days of the month a payment may be scheduled on. Every month has them.
pub const PAYMENT_DAYS: std::ops::RangeInclusive<u32> = 1..=28;

/// Simulation step size.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Granularity {
    #[default]
    Monthly,
    Daily,
}

impl Granularity {
    /// Period cap used when the caller does not set one: 100 years of periods.
    pub fn max_periods(&self) -> usize {
        match self {
            Granularity::Monthly => 100 * 12,
            Granularity::Daily => 36_525,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Monthly => write!(f, "Monthly"),
            Granularity::Daily => write!(f, "Daily"),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoanParameters {
    pub principal: f64,
    pub annual_rate: f64, // nominal, in percent (i.e., 3.5 for 3.5%)
    pub regular_payment: f64,
    pub payment_day: u32, // only gates the regular payment in daily mode
    pub overpayment: f64,
    pub overpayment_day: u32,
    pub start_date: NaiveDate,
    pub granularity: Granularity,
}

impl LoanParameters {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        principal: f64,
        annual_rate: f64,
        regular_payment: f64,
        payment_day: u32,
        overpayment: f64,
        overpayment_day: u32,
        start_date: NaiveDate,
        granularity: Granularity,
    ) -> Self {
        Self {
            principal,
            annual_rate,
            regular_payment,
            payment_day,
            overpayment,
            overpayment_day,
            start_date,
            granularity,
        }
    }

    pub fn with_principal(mut self, principal: f64) -> Self {
        self.principal = principal;
        self
    }

    pub fn with_annual_rate(mut self, annual_rate: f64) -> Self {
        self.annual_rate = annual_rate;
        self
    }

    pub fn with_regular_payment(mut self, amount: f64, day: u32) -> Self {
        self.regular_payment = amount;
        self.payment_day = day;
        self
    }

    pub fn with_overpayment(mut self, amount: f64, day: u32) -> Self {
        self.overpayment = amount;
        self.overpayment_day = day;
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Rejects inputs the engine cannot simulate meaningfully.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if !self.principal.is_finite() || self.principal <= 0. {
            return Err(invalid("principal", "must be a positive finite amount"));
        }
        check_non_negative("annual_rate", self.annual_rate)?;
        check_non_negative("regular_payment", self.regular_payment)?;
        check_non_negative("overpayment", self.overpayment)?;
        check_day("payment_day", self.payment_day)?;
        check_day("overpayment_day", self.overpayment_day)?;
        Ok(())
    }

    // monthly rate is the nominal annual rate split evenly over 12 months
    pub(crate) fn monthly_rate(&self) -> f64 {
        (self.annual_rate / 100.) / 12.
    }

    // fixed 365-day year, no leap-year adjustment
    pub(crate) fn daily_rate(&self) -> f64 {
        (self.annual_rate / 100.) / 365.
    }
}

impl Default for LoanParameters {
    fn default() -> Self {
        Self::new(
            300000.,
            3.5,
            1500.,
            1,
            200.,
            15,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            Granularity::Monthly,
        )
    }
}

impl fmt::Display for LoanParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "principal ${:.2} at {}%, payment ${:.2} on day {}, overpayment ${:.2} on day {}, from {} ({})",
            self.principal,
            self.annual_rate,
            self.regular_payment,
            self.payment_day,
            self.overpayment,
            self.overpayment_day,
            self.start_date,
            self.granularity
        )
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ScheduleError {
    ScheduleError::InvalidParameter { field, reason }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ScheduleError> {
    if value.is_finite() && value >= 0. {
        Ok(())
    } else {
        Err(invalid(field, "must be a non-negative finite amount"))
    }
}

fn check_day(field: &'static str, day: u32) -> Result<(), ScheduleError> {
    if PAYMENT_DAYS.contains(&day) {
        Ok(())
    } else {
        Err(invalid(field, "must be a day of the month from 1 to 28"))
    }
}
