//! Payroll input validation.
//!
//! Validation runs before any calculation or store call, so a rejected
//! input never causes a partial write.

use rust_decimal::Decimal;

use crate::config::PayrollPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::PayrollInput;

/// Validates a payroll input against the payroll policy.
///
/// Checks, in order: employee reference present, month in 1-12, year at
/// least `min_year`, amounts not negative, present days within
/// `0..=max_present_days`. The first failure is returned with the message
/// shown to the user.
///
/// # Examples
///
/// ```
/// use payease_engine::calculation::validate_payroll_input;
/// use payease_engine::config::PayrollPolicy;
/// use payease_engine::models::{EmployeeId, PayrollInput};
/// use rust_decimal::Decimal;
///
/// let input = PayrollInput {
///     employee_id: EmployeeId::new("E001"),
///     month: 13,
///     year: 2025,
///     base_salary: Decimal::from(22000),
///     bonus: Decimal::ZERO,
///     deductions: Decimal::ZERO,
///     present_days: 20,
///     status: None,
///     notes: String::new(),
///     released_date: None,
/// };
///
/// let err = validate_payroll_input(&input, &PayrollPolicy::default()).unwrap_err();
/// assert_eq!(err.to_string(), "Invalid month");
/// ```
pub fn validate_payroll_input(input: &PayrollInput, policy: &PayrollPolicy) -> EngineResult<()> {
    if input.employee_id.as_str().trim().is_empty() {
        return Err(EngineError::validation("employee_id", "Employee ID is required"));
    }

    if !(1..=12).contains(&input.month) {
        return Err(EngineError::validation("month", "Invalid month"));
    }

    if input.year < policy.min_year {
        return Err(EngineError::validation("year", "Invalid year"));
    }

    for (field, amount) in [
        ("base_salary", input.base_salary),
        ("bonus", input.bonus),
        ("deductions", input.deductions),
    ] {
        if amount < Decimal::ZERO {
            return Err(EngineError::validation(field, "Invalid salary values"));
        }
    }

    if input.present_days > policy.max_present_days {
        return Err(EngineError::validation("present_days", "Invalid present days"));
    }

    Ok(())
}
