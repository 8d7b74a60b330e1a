//! Payroll totals and status counts.

use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{PayrollRecord, PayrollStatus, PayrollSummary};

/// Sums the net salaries of a set of payroll records.
///
/// An empty slice totals to zero. A record whose addition would overflow the
/// running total is skipped and logged rather than failing the whole sum.
pub fn total_amount(records: &[PayrollRecord]) -> Decimal {
    records.iter().fold(Decimal::ZERO, |total, record| {
        match total.checked_add(record.net_salary) {
            Some(sum) => sum,
            None => {
                warn!(
                    payroll_id = ?record.id,
                    net_salary = %record.net_salary,
                    "skipping payroll entry that overflows total"
                );
                total
            }
        }
    })
}

/// Builds the dashboard summary for a set of payroll records.
pub fn summarize(records: &[PayrollRecord]) -> PayrollSummary {
    let count = |status: PayrollStatus| records.iter().filter(|r| r.status == status).count();

    PayrollSummary {
        total_records: records.len(),
        total_amount: total_amount(records),
        pending_count: count(PayrollStatus::Pending),
        released_count: count(PayrollStatus::Released),
        canceled_count: count(PayrollStatus::Canceled),
    }
}
