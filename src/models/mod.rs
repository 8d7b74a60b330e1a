//! Core data models for the PayEase engine.
//!
//! One typed record per entity. Stores convert their own row shapes into
//! these types at the repository boundary.

mod account;
mod attendance;
mod audit;
mod employee;
mod payroll;
mod session;

pub use account::{Account, LoginState, NewAccount, ROLE_ADMIN, ROLE_EMPLOYEE};
pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use audit::{AuditStep, AuditWarning};
pub use employee::{Employee, EmployeeId, EmployeeUpdate, NewEmployee};
pub use payroll::{PayrollForm, PayrollInput, PayrollRecord, PayrollStatus, PayrollSummary};
pub use session::{Dashboard, NOT_APPLICABLE, SessionInfo};
