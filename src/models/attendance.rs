//! Attendance records, consumed read-only by payroll.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::EmployeeId;

/// Attendance status for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// At work.
    Present,
    /// Not at work.
    Absent,
    /// At work, arrived late.
    Late,
    /// At work for half the day.
    #[serde(rename = "Half Day")]
    HalfDay,
    /// On leave.
    Leave,
}

impl AttendanceStatus {
    /// Returns true for statuses that count as a present day for payroll.
    ///
    /// # Example
    ///
    /// ```
    /// use payease_engine::models::AttendanceStatus;
    ///
    /// assert!(AttendanceStatus::HalfDay.counts_as_present());
    /// assert!(!AttendanceStatus::Leave.counts_as_present());
    /// ```
    pub fn counts_as_present(self) -> bool {
        matches!(self, Self::Present | Self::Late | Self::HalfDay)
    }
}

/// A single day of attendance for an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee.
    pub employee_id: EmployeeId,
    /// The day.
    pub date: NaiveDate,
    /// Clock-in time.
    pub clock_in: Option<NaiveTime>,
    /// Clock-out time.
    pub clock_out: Option<NaiveTime>,
    /// Day status.
    pub status: AttendanceStatus,
}
