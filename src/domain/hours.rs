/// Hours-per-day calculation
///
/// Both store backends call into this module so the numbers they persist
/// are identical.

use rust_decimal::{Decimal, RoundingStrategy};
use crate::domain::{DomainError, Strategy};

const DAYS_IN_WEEK: i64 = 7;

/// Whole weeks between two dates, rounded to the nearest week
///
/// The order of the dates does not matter. A whole number of days divided
/// by seven never lands exactly on .5, so rounding has no ties.
pub fn weeks_between(start: chrono::NaiveDate, target: chrono::NaiveDate) -> i64 {
    let days = (target - start).num_days().abs();
    (days + DAYS_IN_WEEK / 2) / DAYS_IN_WEEK
}

/// Scheduled workdays over the period minus vacation days
pub fn workable_days(strategy: &Strategy) -> i64 {
    let weeks = weeks_between(strategy.start_date, strategy.target_date);
    i64::from(strategy.days_to_work) * weeks - i64::from(strategy.vacation_days)
}

/// Compute the average hours per day a strategy needs
///
/// `hours_left / workable_days`, rounded half away from zero to 2 decimal
/// places. A schedule without any workable day is an error.
pub fn compute_hours_per_day(strategy: &Strategy) -> Result<Decimal, DomainError> {
    let workable = workable_days(strategy);

    if workable <= 0 {
        return Err(DomainError::DegenerateSchedule { workable_days: workable });
    }

    let hours = Decimal::from(strategy.hours_left) / Decimal::from(workable);

    Ok(hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
