//! Payroll record models and the payroll status state machine.
//!
//! This module contains the [`PayrollRecord`] persisted for each employee and
//! month, the [`PayrollInput`] used to create one, the raw [`PayrollForm`] a
//! form layer submits, and [`PayrollStatus`] with its allowed transitions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::EmployeeId;

/// Lifecycle status of a payroll record.
///
/// | From       | Allowed targets         |
/// |------------|-------------------------|
/// | `Pending`  | `Released`, `Canceled`  |
/// | `Released` | `Pending`, `Canceled`   |
/// | `Canceled` | `Pending`               |
///
/// There is no terminal state.
///
/// # Example
///
/// ```
/// use payease_engine::models::PayrollStatus;
///
/// assert!(PayrollStatus::Pending.can_transition_to(PayrollStatus::Released));
/// assert!(!PayrollStatus::Canceled.can_transition_to(PayrollStatus::Released));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PayrollStatus {
    /// Created and awaiting approval.
    #[default]
    Pending,
    /// Approved for payment.
    Released,
    /// Rejected or voided.
    Canceled,
}

impl PayrollStatus {
    /// Every status, in display order.
    pub const ALL: [PayrollStatus; 3] = [Self::Pending, Self::Released, Self::Canceled];

    /// Statuses reachable from this one by an actual change.
    pub fn allowed_transitions(self) -> &'static [PayrollStatus] {
        match self {
            Self::Pending => &[Self::Released, Self::Canceled],
            Self::Released => &[Self::Pending, Self::Canceled],
            Self::Canceled => &[Self::Pending],
        }
    }

    /// Returns true if a record in this status may be set to `to`.
    ///
    /// Requesting the current status is always allowed and is a no-op.
    pub fn can_transition_to(self, to: PayrollStatus) -> bool {
        self == to || self.allowed_transitions().contains(&to)
    }

    /// Returns the status name as stored.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Released => "Released",
            Self::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayrollStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| EngineError::validation("status", format!("Unknown payroll status: {}", s)))
    }
}

/// A persisted payroll record.
///
/// `net_salary` is always the engine's computed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Store-assigned identifier; `None` until inserted.
    pub id: Option<u64>,
    /// The employee this payroll belongs to.
    pub employee_id: EmployeeId,
    /// Month, 1-12.
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Bonus added to the attendance salary.
    pub bonus: Decimal,
    /// Deductions subtracted from gross.
    pub deductions: Decimal,
    /// Days counted as present.
    pub present_days: u32,
    /// Computed net salary, never negative.
    pub net_salary: Decimal,
    /// Lifecycle status.
    pub status: PayrollStatus,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
    /// When the record was calculated.
    pub processed_date: DateTime<Utc>,
    /// When the record was last released; kept as history after later changes.
    pub released_date: Option<DateTime<Utc>>,
}

/// Typed input for creating a payroll record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollInput {
    /// The employee this payroll belongs to.
    pub employee_id: EmployeeId,
    /// Month, 1-12.
    pub month: u32,
    /// Year.
    pub year: i32,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Bonus.
    #[serde(default)]
    pub bonus: Decimal,
    /// Deductions.
    #[serde(default)]
    pub deductions: Decimal,
    /// Days counted as present, entered manually or sourced from attendance.
    #[serde(default)]
    pub present_days: u32,
    /// Initial status; the policy default when absent.
    #[serde(default)]
    pub status: Option<PayrollStatus>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
    /// Released date carried through only when explicitly supplied.
    #[serde(default)]
    pub released_date: Option<DateTime<Utc>>,
}

/// Raw payroll form values as typed by a user.
///
/// Converting to [`PayrollInput`] performs the parse checks; range checks
/// happen in payroll validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrollForm {
    /// Employee identifier.
    pub employee_id: String,
    /// Month number.
    pub month: String,
    /// Year.
    pub year: String,
    /// Base salary.
    pub base_salary: String,
    /// Bonus; blank means zero.
    pub bonus: String,
    /// Deductions; blank means zero.
    pub deductions: String,
    /// Present days; blank means zero.
    pub present_days: String,
    /// Notes.
    pub notes: String,
}

impl PayrollForm {
    /// Parses the form into a typed [`PayrollInput`].
    ///
    /// # Example
    ///
    /// ```
    /// use payease_engine::models::PayrollForm;
    ///
    /// let form = PayrollForm {
    ///     employee_id: "E001".to_string(),
    ///     month: "3".to_string(),
    ///     year: "2025".to_string(),
    ///     base_salary: "22000".to_string(),
    ///     bonus: "abc".to_string(),
    ///     ..Default::default()
    /// };
    /// assert_eq!(form.parse().unwrap_err().to_string(), "Invalid salary values");
    /// ```
    pub fn parse(&self) -> EngineResult<PayrollInput> {
        let employee_id = self.employee_id.trim();
        if employee_id.is_empty() {
            return Err(EngineError::validation("employee_id", "Employee ID is required"));
        }

        let month = self
            .month
            .trim()
            .parse::<u32>()
            .map_err(|_| EngineError::validation("month", "Invalid month"))?;
        let year = self
            .year
            .trim()
            .parse::<i32>()
            .map_err(|_| EngineError::validation("year", "Invalid year"))?;

        let money = |field: &str, raw: &str| -> EngineResult<Decimal> {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(Decimal::ZERO);
            }
            raw.parse::<Decimal>()
                .map_err(|_| EngineError::validation(field, "Invalid salary values"))
        };
        let base_salary = money("base_salary", &self.base_salary)?;
        let bonus = money("bonus", &self.bonus)?;
        let deductions = money("deductions", &self.deductions)?;

        let present_days = match self.present_days.trim() {
            "" => 0,
            raw => raw.parse::<i64>().map_err(|_| {
                EngineError::validation("present_days", "Invalid present days format")
            })?,
        };
        let present_days = u32::try_from(present_days)
            .map_err(|_| EngineError::validation("present_days", "Invalid present days"))?;

        Ok(PayrollInput {
            employee_id: EmployeeId::new(employee_id),
            month,
            year,
            base_salary,
            bonus,
            deductions,
            present_days,
            status: None,
            notes: self.notes.trim().to_string(),
            released_date: None,
        })
    }
}

/// Aggregate figures over a set of payroll records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// Number of records.
    pub total_records: usize,
    /// Sum of net salaries.
    pub total_amount: Decimal,
    /// Records in `Pending`.
    pub pending_count: usize,
    /// Records in `Released`.
    pub released_count: usize,
    /// Records in `Canceled`.
    pub canceled_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn form() -> PayrollForm {
        PayrollForm {
            employee_id: "E001".to_string(),
            month: "3".to_string(),
            year: "2025".to_string(),
            base_salary: "22000".to_string(),
            bonus: "500".to_string(),
            deductions: "300".to_string(),
            present_days: "20".to_string(),
            notes: " March ".to_string(),
        }
    }

    #[test]
    fn test_transitions_from_pending() {
        assert!(PayrollStatus::Pending.can_transition_to(PayrollStatus::Released));
        assert!(PayrollStatus::Pending.can_transition_to(PayrollStatus::Canceled));
    }

    #[test]
    fn test_transitions_from_released() {
        assert!(PayrollStatus::Released.can_transition_to(PayrollStatus::Pending));
        assert!(PayrollStatus::Released.can_transition_to(PayrollStatus::Canceled));
    }

    #[test]
    fn test_canceled_only_returns_to_pending() {
        assert_eq!(
            PayrollStatus::Canceled.allowed_transitions(),
            &[PayrollStatus::Pending]
        );
        assert!(!PayrollStatus::Canceled.can_transition_to(PayrollStatus::Released));
    }

    #[test]
    fn test_same_status_is_allowed_noop() {
        for status in PayrollStatus::ALL {
            assert!(status.can_transition_to(status));
            assert!(!status.allowed_transitions().contains(&status));
        }
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&PayrollStatus::Released).unwrap(),
            "\"Released\""
        );
        let status: PayrollStatus = serde_json::from_str("\"Canceled\"").unwrap();
        assert_eq!(status, PayrollStatus::Canceled);
    }

    #[test]
    fn test_status_from_str_is_case_insensitive() {
        assert_eq!(PayrollStatus::from_str("released").unwrap(), PayrollStatus::Released);
        assert!(PayrollStatus::from_str("approved").is_err());
    }

    #[test]
    fn test_form_parses_valid_values() {
        let input = form().parse().unwrap();
        assert_eq!(input.employee_id.as_str(), "E001");
        assert_eq!(input.month, 3);
        assert_eq!(input.year, 2025);
        assert_eq!(input.base_salary, Decimal::from(22000));
        assert_eq!(input.bonus, Decimal::from(500));
        assert_eq!(input.deductions, Decimal::from(300));
        assert_eq!(input.present_days, 20);
        assert_eq!(input.notes, "March");
        assert_eq!(input.status, None);
    }

    #[test]
    fn test_form_blank_amounts_are_zero() {
        let mut raw = form();
        raw.bonus.clear();
        raw.deductions = "  ".to_string();
        raw.present_days.clear();
        let input = raw.parse().unwrap();
        assert_eq!(input.bonus, Decimal::ZERO);
        assert_eq!(input.deductions, Decimal::ZERO);
        assert_eq!(input.present_days, 0);
    }

    #[test]
    fn test_form_requires_employee() {
        let mut raw = form();
        raw.employee_id = "   ".to_string();
        assert_eq!(raw.parse().unwrap_err().to_string(), "Employee ID is required");
    }

    #[test]
    fn test_form_rejects_non_numeric_month() {
        let mut raw = form();
        raw.month = "March".to_string();
        assert_eq!(raw.parse().unwrap_err().to_string(), "Invalid month");
    }

    #[test]
    fn test_form_rejects_non_numeric_days() {
        let mut raw = form();
        raw.present_days = "twenty".to_string();
        assert_eq!(
            raw.parse().unwrap_err().to_string(),
            "Invalid present days format"
        );
    }

    #[test]
    fn test_form_rejects_negative_days() {
        let mut raw = form();
        raw.present_days = "-1".to_string();
        assert_eq!(raw.parse().unwrap_err().to_string(), "Invalid present days");
    }
}
