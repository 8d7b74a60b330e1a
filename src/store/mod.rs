//! Persistence seams for the engines.
//!
//! Each engine talks to storage only through the traits below. A store
//! reports failures as [`StoreError`]; the engines map it to
//! [`EngineError::Persistence`](crate::error::EngineError::Persistence) so no
//! store detail leaks to callers.
//!
//! [`InMemoryStore`] implements every trait and backs the tests.

mod memory;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{
    Account, Employee, EmployeeId, LoginState, NewAccount, PayrollRecord, PayrollStatus,
};

pub use memory::InMemoryStore;

/// Failures reported by a store implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A unique column already holds this value.
    #[error("duplicate {field}: {value}")]
    Duplicate {
        /// The unique field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// A row the operation depends on does not exist.
    #[error("{entity} {id} does not exist")]
    Missing {
        /// The kind of row.
        entity: &'static str,
        /// Its identifier.
        id: String,
    },
}

/// A type alias for Results that return StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Account lookups and login bookkeeping.
pub trait AccountRepository: Send + Sync {
    /// Finds an account by exact username.
    fn find_account_by_username(&self, username: &str) -> StoreResult<Option<Account>>;

    /// Finds the account linked to an employee.
    fn find_account_by_employee(&self, employee_id: &EmployeeId) -> StoreResult<Option<Account>>;

    /// Inserts an account and returns its id. Fails with
    /// [`StoreError::Duplicate`] on a taken username.
    fn insert_account(&self, account: NewAccount) -> StoreResult<u64>;

    /// Writes the login bookkeeping of an account.
    fn update_login_state(&self, account_id: u64, state: LoginState) -> StoreResult<()>;
}

/// Employee records.
pub trait EmployeeRepository: Send + Sync {
    /// Finds an employee by id, archived or not.
    fn find_employee_by_id(&self, id: &EmployeeId) -> StoreResult<Option<Employee>>;

    /// Finds an employee by email, compared case-insensitively.
    fn find_employee_by_email(&self, email: &str) -> StoreResult<Option<Employee>>;

    /// Lists every employee, archived included, ordered by id.
    fn list_employees(&self) -> StoreResult<Vec<Employee>>;

    /// Inserts an employee. Fails with [`StoreError::Duplicate`] on a taken
    /// id or email.
    fn insert_employee(&self, employee: Employee) -> StoreResult<()>;

    /// Replaces an existing employee. Fails with [`StoreError::Missing`]
    /// when the id is unknown.
    fn update_employee(&self, employee: Employee) -> StoreResult<()>;

    /// Removes an employee, returning whether it existed.
    fn delete_employee(&self, id: &EmployeeId) -> StoreResult<bool>;
}

/// Payroll records.
pub trait PayrollRepository: Send + Sync {
    /// Inserts a record and returns the assigned id. The record's own `id`
    /// is ignored.
    fn insert_payroll(&self, record: PayrollRecord) -> StoreResult<u64>;

    /// Finds a record by id.
    fn find_payroll(&self, id: u64) -> StoreResult<Option<PayrollRecord>>;

    /// Sets the status and released date of a record, returning whether a
    /// row was updated.
    fn update_payroll_status(
        &self,
        id: u64,
        status: PayrollStatus,
        released_date: Option<DateTime<Utc>>,
    ) -> StoreResult<bool>;

    /// Lists every record.
    fn find_all_payroll(&self) -> StoreResult<Vec<PayrollRecord>>;

    /// Lists the records of one employee.
    fn find_payroll_by_employee(&self, employee_id: &EmployeeId) -> StoreResult<Vec<PayrollRecord>>;

    /// Removes a record, returning whether it existed.
    fn delete_payroll(&self, id: u64) -> StoreResult<bool>;
}

/// Attendance totals used to prefill payroll.
pub trait AttendanceSummary: Send + Sync {
    /// Counts the days an employee was present, late or on a half day.
    ///
    /// With both `month` and `year` the count covers that month only;
    /// otherwise it covers all recorded attendance.
    fn count_present_days(
        &self,
        employee_id: &EmployeeId,
        month: Option<u32>,
        year: Option<i32>,
    ) -> StoreResult<u32>;
}
