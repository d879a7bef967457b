/// Input validation for strategy forms
///
/// The store accepts whatever it is given; this layer enforces the rules a
/// user-facing form needs. Every failing field contributes one message so
/// the caller can show them all at once.

use chrono::NaiveDate;
use serde::Deserialize;
use crate::domain::{parse_date, validate_title, DomainError, NewStrategy};

/// Raw create form, every field as typed by the user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategyForm {
    pub title: String,
    pub start_date: String,
    pub target_date: String,
    pub hours_left: String,
    pub vacation_days: String,
    pub days_to_work: String,
}

/// Raw edit form; the title is optional because renames are rare
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategyEditForm {
    pub title: Option<String>,
    pub start_date: String,
    pub target_date: String,
    pub hours_left: String,
    pub vacation_days: String,
    pub days_to_work: String,
}

/// Validated edit values
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyEdit {
    pub title: Option<String>,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    pub hours_left: u32,
    pub vacation_days: u32,
    pub days_to_work: u32,
}

/// Validate a create form
pub fn validate_new(form: &StrategyForm) -> Result<NewStrategy, Vec<DomainError>> {
    let mut errors = Vec::new();

    let title = collect(&mut errors, validate_title(&form.title));
    let schedule = validate_schedule(
        &mut errors,
        &form.start_date,
        &form.target_date,
        &form.hours_left,
        &form.vacation_days,
        &form.days_to_work,
    );

    match (title, schedule) {
        (Some(title), Some(s)) if errors.is_empty() => {
            Ok(NewStrategy {
                title,
                start_date: s.start_date,
                target_date: s.target_date,
                hours_left: s.hours_left,
                vacation_days: s.vacation_days,
                days_to_work: s.days_to_work,
            })
        }
        _ => Err(errors),
    }
}

/// Validate an edit form
pub fn validate_edit(form: &StrategyEditForm) -> Result<StrategyEdit, Vec<DomainError>> {
    let mut errors = Vec::new();

    let title = match &form.title {
        Some(raw) => collect(&mut errors, validate_title(raw)).map(Some),
        None => Some(None),
    };
    let schedule = validate_schedule(
        &mut errors,
        &form.start_date,
        &form.target_date,
        &form.hours_left,
        &form.vacation_days,
        &form.days_to_work,
    );

    match (title, schedule) {
        (Some(title), Some(s)) if errors.is_empty() => Ok(StrategyEdit { title, ..s }),
        _ => Err(errors),
    }
}

fn validate_schedule(
    errors: &mut Vec<DomainError>,
    start_date: &str,
    target_date: &str,
    hours_left: &str,
    vacation_days: &str,
    days_to_work: &str,
) -> Option<StrategyEdit> {
    let start = collect(errors, date_field(start_date, "start_date", "Start Date", "A start date is required."));
    let target = collect(errors, date_field(target_date, "target_date", "Target Date", "A target date is required."));
    let hours = collect(errors, count_field(
        hours_left,
        "hours_left",
        "Number of hours must be a positive integer.",
    ));
    let vacation = collect(errors, count_field(
        vacation_days,
        "vacation_days",
        "Number of vacation days must be a positive integer.",
    ));
    let days = collect(errors, days_to_work_field(days_to_work));

    if let (Some(start), Some(target)) = (start, target) {
        if target < start {
            errors.push(DomainError::Validation {
                field: "target_date".to_string(),
                message: "Target Date must not be before Start Date.".to_string(),
            });
        }
    }

    Some(StrategyEdit {
        title: None,
        start_date: start?,
        target_date: target?,
        hours_left: hours?,
        vacation_days: vacation?,
        days_to_work: days?,
    })
}

fn collect<T>(errors: &mut Vec<DomainError>, result: Result<T, DomainError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

fn date_field(raw: &str, field: &str, label: &str, required: &str) -> Result<NaiveDate, DomainError> {
    if raw.trim().is_empty() {
        return Err(DomainError::Validation {
            field: field.to_string(),
            message: required.to_string(),
        });
    }

    parse_date(raw).map_err(|_| DomainError::Validation {
        field: field.to_string(),
        message: format!("{} must be in YYYY/MM/DD format.", label),
    })
}

fn count_field(raw: &str, field: &str, message: &str) -> Result<u32, DomainError> {
    raw.trim().parse::<u32>().map_err(|_| DomainError::Validation {
        field: field.to_string(),
        message: message.to_string(),
    })
}

fn days_to_work_field(raw: &str) -> Result<u32, DomainError> {
    match raw.trim().parse::<u32>() {
        Ok(days) if (1..=7).contains(&days) => Ok(days),
        _ => Err(DomainError::Validation {
            field: "days_to_work".to_string(),
            message: "Days planned to work per week must be a positive integer between 1 and 7.".to_string(),
        }),
    }
}

/// Flatten validation errors into user-facing messages
pub fn messages(errors: &[DomainError]) -> Vec<String> {
    errors
        .iter()
        .map(|e| match e {
            DomainError::Validation { message, .. } => message.clone(),
            DomainError::InvalidTitle(message) => message.clone(),
            other => other.to_string(),
        })
        .collect()
}
