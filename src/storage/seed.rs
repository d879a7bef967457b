/// Demo strategies loaded into an empty store on request

use chrono::NaiveDate;
use crate::domain::{compute_hours_per_day, DomainError, NewStrategy, Strategy};

/// (title, start, target, hours_left, vacation_days, days_to_work)
const SEED: [(&str, (i32, u32, u32), (i32, u32, u32), u32, u32, u32); 2] = [
    ("My Strategy", (2022, 1, 15), (2024, 1, 15), 1200, 40, 5),
    ("Alternate Strategy", (2021, 1, 15), (2024, 1, 15), 1200, 30, 6),
];

/// Input records for the seed strategies
pub fn seed_inputs() -> Result<Vec<NewStrategy>, DomainError> {
    SEED.iter()
        .map(|&(title, start, target, hours_left, vacation_days, days_to_work)| {
            NewStrategy::new(
                title,
                ymd(start)?,
                ymd(target)?,
                hours_left,
                vacation_days,
                days_to_work,
            )
        })
        .collect()
}

/// Seed strategies with fresh ids and computed hours per day
pub fn seed_strategies() -> Result<Vec<Strategy>, DomainError> {
    seed_inputs()?
        .into_iter()
        .map(|new| {
            let mut strategy = Strategy::from_new(new);
            strategy.hours_per_day = Some(compute_hours_per_day(&strategy)?);
            Ok(strategy)
        })
        .collect()
}

fn ymd((y, m, d): (i32, u32, u32)) -> Result<NaiveDate, DomainError> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| DomainError::InvalidDate(format!("{}-{}-{}", y, m, d)))
}
