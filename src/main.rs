use chrono::Local;
use log::info;
use overpay::{compute_schedule, Granularity, LoanParameters};
use simple_logger::SimpleLogger;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()?;

    // "today" is decided here, never inside the engine
    let params = LoanParameters::default()
        .with_start_date(Local::now().date_naive())
        .with_granularity(Granularity::Monthly);

    let schedule = compute_schedule(&params)?;
    schedule.show_schedule();

    info!(
        "{} periods, paid off {}, total interest ${:.2}, total paid ${:.2}",
        schedule.len(),
        schedule
            .payoff_date()
            .map_or_else(|| "-".to_string(), |d| d.to_string()),
        schedule.total_interest(),
        schedule.total_paid()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use overpay::{LoanParameters, PeriodRecord, Schedule, ScheduleError, ScheduleIter};

    // verifies that types can implement the gated traits below
    fn is_normal<T: Sized + Send + Sync + Unpin>() {}

    #[test]
    fn normal_types() {
        is_normal::<LoanParameters>();
        is_normal::<PeriodRecord>();
        is_normal::<Schedule>();
        is_normal::<ScheduleIter>();
        is_normal::<ScheduleError>();
    }
}
