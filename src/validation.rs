use chrono::NaiveDateTime;
use std::str::FromStr;

use crate::errors::{FieldViolation, ValidationError};

/// Collects field violations across a whole candidate record so a failed
/// validation reports every offending field at once, not just the first.
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<FieldViolation>,
}

impl Validator {
    pub fn new() -> Self {
        Validator {
            violations: Vec::new(),
        }
    }

    pub fn violation(&mut self, field: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn positive_amount(&mut self, field: &str, amount: f64) {
        if !amount.is_finite() || amount <= 0.0 {
            self.violation(field, "must be a positive amount");
        }
    }

    pub fn required_text(&mut self, field: &str, value: &str, max_length: usize) {
        if value.trim().is_empty() {
            self.violation(field, "must not be empty");
        } else if value.chars().count() > max_length {
            self.violation(field, format!("must be at most {} characters", max_length));
        }
    }

    pub fn optional_text(&mut self, field: &str, value: Option<&str>, max_length: usize) {
        if let Some(text) = value {
            if text.chars().count() > max_length {
                self.violation(field, format!("must be at most {} characters", max_length));
            }
        }
    }

    /// Cross-field rule: a recurring record must name its period, and a
    /// one-off record must not carry one.
    pub fn recurring_pair(&mut self, is_recurring: bool, period: Option<&str>) {
        match (is_recurring, period) {
            (true, None) => {
                self.violation("recurring_period", "required for recurring records")
            }
            (false, Some(_)) => {
                self.violation("recurring_period", "only allowed on recurring records")
            }
            _ => {}
        }
    }

    pub fn percentage(&mut self, field: &str, value: f64) {
        if !value.is_finite() || value <= 0.0 || value > 100.0 {
            self.violation(field, "must be between 0 and 100");
        }
    }

    pub fn future_date(&mut self, field: &str, date: NaiveDateTime, now: NaiveDateTime) {
        if date <= now {
            self.violation(field, "must be in the future");
        }
    }

    /// Parses a closed-set value, recording a violation on failure.
    pub fn closed_set<T: FromStr>(&mut self, field: &str, raw: &str) -> Option<T> {
        match raw.parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.violation(field, format!("'{}' is not a recognized value", raw));
                None
            }
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Fields(self.violations))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn collects_every_violation() {
        let mut v = Validator::new();
        v.positive_amount("amount", -5.0);
        v.required_text("title", "  ", 100);
        v.recurring_pair(true, None);
        let err = v.finish().unwrap_err();
        match err {
            ValidationError::Fields(fields) => {
                assert_eq!(fields.len(), 3);
                assert_eq!(fields[0].field, "amount");
                assert_eq!(fields[1].field, "title");
                assert_eq!(fields[2].field, "recurring_period");
            }
            other => panic!("expected field violations, got {:?}", other),
        }
    }

    #[test]
    fn passes_clean_record() {
        let mut v = Validator::new();
        v.positive_amount("amount", 12.5);
        v.required_text("title", "New bike", 100);
        v.recurring_pair(false, None);
        v.future_date("deadline", at(2031, 1, 1), at(2026, 1, 1));
        assert!(v.finish().is_ok());
    }

    #[test]
    fn closed_set_records_unknown_values() {
        let mut v = Validator::new();
        let parsed: Option<Category> = v.closed_set("category", "snacks");
        assert!(parsed.is_none());
        assert!(v.finish().is_err());

        let mut v = Validator::new();
        let parsed: Option<Category> = v.closed_set("category", "food");
        assert_eq!(parsed, Some(Category::Food));
        assert!(v.finish().is_ok());
    }

    #[test]
    fn one_off_record_must_not_carry_period() {
        let mut v = Validator::new();
        v.recurring_pair(false, Some("weekly"));
        assert!(v.finish().is_err());
    }
}
