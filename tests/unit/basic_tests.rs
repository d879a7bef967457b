/// Basic unit tests to verify core functionality
use chrono::NaiveDate;
use hours_planner_mcp::validation::{self, StrategyForm};
use hours_planner_mcp::*;
use rust_decimal::Decimal;
use std::str::FromStr;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn form() -> StrategyForm {
    StrategyForm {
        title: "Thesis".to_string(),
        start_date: "2022-01-15".to_string(),
        target_date: "2024-01-15".to_string(),
        hours_left: "1200".to_string(),
        vacation_days: "40".to_string(),
        days_to_work: "5".to_string(),
    }
}

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    #[test]
    fn test_strategy_creation() {
        let new = NewStrategy::new("Test Strategy", date(2022, 1, 15), date(2024, 1, 15), 1200, 40, 5);

        assert!(new.is_ok());
        let strategy = Strategy::from_new(new.unwrap());
        assert_eq!(strategy.title, "Test Strategy");
        assert_eq!(strategy.start_date_string(), "2022-01-15");
        assert!(strategy.hours_per_day.is_none());
    }

    #[test]
    fn test_hours_per_day_for_seed_schedules() {
        let first = Strategy::from_new(
            NewStrategy::new("a", date(2022, 1, 15), date(2024, 1, 15), 1200, 40, 5).unwrap(),
        );
        let second = Strategy::from_new(
            NewStrategy::new("b", date(2021, 1, 15), date(2024, 1, 15), 1200, 30, 6).unwrap(),
        );

        assert_eq!(compute_hours_per_day(&first).unwrap(), Decimal::from_str("2.50").unwrap());
        assert_eq!(compute_hours_per_day(&second).unwrap(), Decimal::from_str("1.32").unwrap());
    }

    #[test]
    fn test_no_workable_days_is_an_error() {
        let strategy = Strategy::from_new(
            NewStrategy::new("short", date(2024, 1, 1), date(2024, 1, 2), 10, 0, 5).unwrap(),
        );

        assert_eq!(weeks_between(strategy.start_date, strategy.target_date), 0);
        assert!(matches!(
            compute_hours_per_day(&strategy),
            Err(DomainError::DegenerateSchedule { workable_days: 0 })
        ));
    }

    #[test]
    fn test_dates_accept_both_separators() {
        assert_eq!(parse_date("2024-03-01").unwrap(), date(2024, 3, 1));
        assert_eq!(parse_date("2024/03/01").unwrap(), date(2024, 3, 1));
        assert!(parse_date("03/01/2024").is_err());
    }

    #[test]
    fn test_valid_form() {
        let new = validation::validate_new(&form()).unwrap();
        assert_eq!(new.title, "Thesis");
        assert_eq!(new.days_to_work, 5);
    }

    #[test]
    fn test_form_collects_every_error() {
        let mut bad = form();
        bad.title = "   ".to_string();
        bad.hours_left = "-3".to_string();
        bad.days_to_work = "9".to_string();

        let errors = validation::validate_new(&bad).unwrap_err();
        let messages = validation::messages(&errors);
        assert_eq!(messages.len(), 3);
        assert!(messages.contains(&"Number of hours must be a positive integer.".to_string()));
        assert!(messages
            .contains(&"Days planned to work per week must be a positive integer between 1 and 7.".to_string()));
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let mut reversed = form();
        reversed.start_date = "2024-01-15".to_string();
        reversed.target_date = "2022-01-15".to_string();

        let messages = validation::messages(&validation::validate_new(&reversed).unwrap_err());
        assert_eq!(messages, vec!["Target Date must not be before Start Date.".to_string()]);
    }

    #[test]
    fn test_strategy_id_round_trips_through_text() {
        let id = StrategyId::new();
        let parsed = StrategyId::from_string(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
        assert!(StrategyId::from_string("not-an-id").is_err());
    }
}
