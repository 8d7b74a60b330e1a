//! Net salary calculation.
//!
//! This module derives the net salary of a monthly payroll from the base
//! salary, present days, bonus and deductions:
//!
//! ```text
//! daily_rate        = base_salary / working_days_per_month
//! attendance_salary = daily_rate * present_days
//! gross_salary      = attendance_salary + bonus
//! net_salary        = max(0, gross_salary - deductions)
//! ```

use rust_decimal::Decimal;

use crate::config::PayrollPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning};

/// Warning code emitted when deductions exceed gross salary.
pub const NET_SALARY_CLAMPED: &str = "NET_SALARY_CLAMPED";

/// The components of a net salary calculation.
#[derive(Debug, Clone)]
pub struct NetSalaryResult {
    /// Base salary divided by the working days per month.
    pub daily_rate: Decimal,
    /// Daily rate times present days.
    pub attendance_salary: Decimal,
    /// Attendance salary plus bonus.
    pub gross_salary: Decimal,
    /// Gross minus deductions, floored at zero.
    pub net_salary: Decimal,
    /// True when the deductions exceeded gross and net was floored.
    pub clamped: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Set when the floor was applied.
    pub warning: Option<AuditWarning>,
}

/// Calculates the net salary for one month.
///
/// Deductions larger than gross are absorbed: the net salary is floored at
/// zero and a [`NET_SALARY_CLAMPED`] warning is attached instead of failing.
///
/// # Errors
///
/// Returns `CalculationError` if the policy has zero working days or the
/// arithmetic overflows.
///
/// # Examples
///
/// ```
/// use payease_engine::calculation::calculate_net_salary;
/// use payease_engine::config::PayrollPolicy;
/// use rust_decimal::Decimal;
///
/// let result = calculate_net_salary(
///     Decimal::from(22000),
///     20,
///     Decimal::from(500),
///     Decimal::from(300),
///     &PayrollPolicy::default(),
/// )
/// .unwrap();
///
/// assert_eq!(result.daily_rate, Decimal::from(1000));
/// assert_eq!(result.attendance_salary, Decimal::from(20000));
/// assert_eq!(result.gross_salary, Decimal::from(20500));
/// assert_eq!(result.net_salary, Decimal::from(20200));
/// ```
pub fn calculate_net_salary(
    base_salary: Decimal,
    present_days: u32,
    bonus: Decimal,
    deductions: Decimal,
    policy: &PayrollPolicy,
) -> EngineResult<NetSalaryResult> {
    let working_days = Decimal::from(policy.working_days_per_month);
    let overflow = |what: &str| EngineError::CalculationError {
        message: format!("{} overflowed", what),
    };

    let daily_rate = base_salary
        .checked_div(working_days)
        .ok_or_else(|| EngineError::CalculationError {
            message: "working_days_per_month must be greater than zero".to_string(),
        })?;
    let attendance_salary = daily_rate
        .checked_mul(Decimal::from(present_days))
        .ok_or_else(|| overflow("attendance salary"))?;
    let gross_salary = attendance_salary
        .checked_add(bonus)
        .ok_or_else(|| overflow("gross salary"))?;
    let unclamped = gross_salary
        .checked_sub(deductions)
        .ok_or_else(|| overflow("net salary"))?;

    let clamped = unclamped < Decimal::ZERO;
    let net_salary = unclamped.max(Decimal::ZERO);

    let reasoning = if clamped {
        format!(
            "${} / {} x {} days + ${} bonus - ${} deductions = ${} (floored at $0)",
            base_salary.normalize(),
            policy.working_days_per_month,
            present_days,
            bonus.normalize(),
            deductions.normalize(),
            unclamped.normalize()
        )
    } else {
        format!(
            "${} / {} x {} days + ${} bonus - ${} deductions = ${}",
            base_salary.normalize(),
            policy.working_days_per_month,
            present_days,
            bonus.normalize(),
            deductions.normalize(),
            net_salary.normalize()
        )
    };

    // Net salary is the single step of a payroll calculation.
    let audit_step = AuditStep {
        step_number: 1,
        rule_id: "net_salary".to_string(),
        rule_name: "Net Salary".to_string(),
        policy_ref: "payroll.working_days_per_month".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.normalize().to_string(),
            "present_days": present_days,
            "bonus": bonus.normalize().to_string(),
            "deductions": deductions.normalize().to_string(),
            "working_days_per_month": policy.working_days_per_month
        }),
        output: serde_json::json!({
            "daily_rate": daily_rate.normalize().to_string(),
            "attendance_salary": attendance_salary.normalize().to_string(),
            "gross_salary": gross_salary.normalize().to_string(),
            "net_salary": net_salary.normalize().to_string(),
            "clamped": clamped
        }),
        reasoning,
    };

    let warning = clamped.then(|| AuditWarning {
        code: NET_SALARY_CLAMPED.to_string(),
        message: format!(
            "Deductions ${} exceed gross salary ${}; net salary set to $0",
            deductions.normalize(),
            gross_salary.normalize()
        ),
        severity: "medium".to_string(),
    });

    Ok(NetSalaryResult {
        daily_rate,
        attendance_salary,
        gross_salary,
        net_salary,
        clamped,
        audit_step,
        warning,
    })
}
