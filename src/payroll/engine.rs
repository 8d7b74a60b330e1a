//! Payroll creation and lifecycle.

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use crate::calculation::{
    NetSalaryResult, calculate_net_salary, summarize, total_amount, validate_payroll_input,
};
use crate::config::PayrollPolicy;
use crate::error::{EngineError, EngineResult};
use crate::locks::KeyedLocks;
use crate::models::{EmployeeId, PayrollInput, PayrollRecord, PayrollStatus, PayrollSummary};
use crate::store::{AttendanceSummary, PayrollRepository};

const PAYROLL_RECORD: &str = "Payroll record";

/// Validates, computes and stores monthly payroll records and drives their
/// status through the payroll state machine.
pub struct PayrollEngine {
    payroll: Arc<dyn PayrollRepository>,
    attendance: Arc<dyn AttendanceSummary>,
    policy: PayrollPolicy,
    locks: KeyedLocks<u64>,
}

impl PayrollEngine {
    /// Creates an engine over the given repositories.
    pub fn new(
        payroll: Arc<dyn PayrollRepository>,
        attendance: Arc<dyn AttendanceSummary>,
        policy: PayrollPolicy,
    ) -> Self {
        Self {
            payroll,
            attendance,
            policy,
            locks: KeyedLocks::new(),
        }
    }

    /// Returns the policy this engine applies.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }

    /// Checks an input without computing or storing anything.
    pub fn validate(&self, input: &PayrollInput) -> EngineResult<()> {
        validate_payroll_input(input, &self.policy)
    }

    /// Validates an input and returns the full net salary breakdown,
    /// including its audit step and any clamping warning.
    pub fn explain(&self, input: &PayrollInput) -> EngineResult<NetSalaryResult> {
        self.validate(input)?;
        calculate_net_salary(
            input.base_salary,
            input.present_days,
            input.bonus,
            input.deductions,
            &self.policy,
        )
    }

    /// Validates an input and computes the record it would produce.
    ///
    /// The status defaults to the policy's default status, `processed_date`
    /// is now, and `released_date` is carried only when the input sets it.
    /// A clamped net salary is logged at `warn`.
    pub fn calculate(&self, input: &PayrollInput) -> EngineResult<PayrollRecord> {
        let result = self.explain(input)?;
        if let Some(warning) = &result.warning {
            warn!(
                employee_id = %input.employee_id,
                code = %warning.code,
                "{}",
                warning.message
            );
        }
        debug!(reasoning = %result.audit_step.reasoning, "net salary computed");

        Ok(PayrollRecord {
            id: None,
            employee_id: input.employee_id.clone(),
            month: input.month,
            year: input.year,
            base_salary: input.base_salary,
            bonus: input.bonus,
            deductions: input.deductions,
            present_days: input.present_days,
            net_salary: result.net_salary,
            status: input.status.unwrap_or(self.policy.default_status),
            notes: input.notes.clone(),
            processed_date: Utc::now(),
            released_date: input.released_date,
        })
    }

    /// Validates, computes and stores a payroll record, returning its id.
    #[instrument(skip(self, input), fields(employee_id = %input.employee_id))]
    pub fn create(&self, input: &PayrollInput) -> EngineResult<u64> {
        let record = self.calculate(input)?;
        let net_salary = record.net_salary;
        let id = self.payroll.insert_payroll(record)?;
        info!(record_id = id, net_salary = %net_salary, "payroll record created");
        Ok(id)
    }

    /// Creates a payroll record whose present days come from attendance.
    ///
    /// Any `present_days` on the input is replaced with the attendance count
    /// for the input's month and year.
    #[instrument(skip(self, input), fields(employee_id = %input.employee_id))]
    pub fn create_from_attendance(&self, input: &PayrollInput) -> EngineResult<u64> {
        let mut input = input.clone();
        input.present_days = 0;
        self.validate(&input)?;

        input.present_days = self.attendance.count_present_days(
            &input.employee_id,
            Some(input.month),
            Some(input.year),
        )?;
        debug!(present_days = input.present_days, "present days taken from attendance");
        self.create(&input)
    }

    /// Moves a record to `to`.
    ///
    /// Requesting the current status is a no-op that returns the record
    /// unchanged. Moving to `Released` stamps `released_date`; other moves
    /// keep whatever date is already there.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id is unknown, `InvalidTransition` when the state
    /// machine forbids the move.
    #[instrument(skip(self))]
    pub fn transition(&self, id: u64, to: PayrollStatus) -> EngineResult<PayrollRecord> {
        self.locks.with_lock(id, || {
            let mut record = self.get(id)?;
            let from = record.status;

            if from == to {
                debug!(record_id = id, status = %to, "status unchanged");
                return Ok(record);
            }
            if !from.can_transition_to(to) {
                warn!(record_id = id, %from, %to, "payroll transition rejected");
                return Err(EngineError::InvalidTransition { from, to });
            }

            let released_date = match to {
                PayrollStatus::Released => Some(Utc::now()),
                _ => record.released_date,
            };
            if !self.payroll.update_payroll_status(id, to, released_date)? {
                return Err(EngineError::not_found(PAYROLL_RECORD, id));
            }

            record.status = to;
            record.released_date = released_date;
            info!(record_id = id, %from, %to, "payroll status changed");
            Ok(record)
        })
    }

    /// Marks a record as released.
    pub fn release(&self, id: u64) -> EngineResult<PayrollRecord> {
        self.transition(id, PayrollStatus::Released)
    }

    /// Cancels a record.
    pub fn cancel(&self, id: u64) -> EngineResult<PayrollRecord> {
        self.transition(id, PayrollStatus::Canceled)
    }

    /// Puts a record back to pending.
    pub fn set_pending(&self, id: u64) -> EngineResult<PayrollRecord> {
        self.transition(id, PayrollStatus::Pending)
    }

    /// Fetches a record by id.
    pub fn get(&self, id: u64) -> EngineResult<PayrollRecord> {
        self.payroll
            .find_payroll(id)?
            .ok_or_else(|| EngineError::not_found(PAYROLL_RECORD, id))
    }

    /// Lists every record, most recently processed first.
    pub fn list_all(&self) -> EngineResult<Vec<PayrollRecord>> {
        let mut records = self.payroll.find_all_payroll()?;
        records.sort_by_key(|r| Reverse(r.processed_date));
        Ok(records)
    }

    /// Lists one employee's records, latest pay period first.
    pub fn list_for_employee(&self, employee_id: &EmployeeId) -> EngineResult<Vec<PayrollRecord>> {
        let mut records = self.payroll.find_payroll_by_employee(employee_id)?;
        records.sort_by_key(|r| Reverse((r.year, r.month)));
        Ok(records)
    }

    /// Deletes a record.
    #[instrument(skip(self))]
    pub fn delete(&self, id: u64) -> EngineResult<()> {
        self.locks.with_lock(id, || {
            if !self.payroll.delete_payroll(id)? {
                return Err(EngineError::not_found(PAYROLL_RECORD, id));
            }
            info!(record_id = id, "payroll record deleted");
            Ok(())
        })
    }

    /// Sums the net salaries of `records`.
    pub fn total_amount(&self, records: &[PayrollRecord]) -> Decimal {
        total_amount(records)
    }

    /// Totals and status counts for `records`.
    pub fn summary(&self, records: &[PayrollRecord]) -> PayrollSummary {
        summarize(records)
    }
}
