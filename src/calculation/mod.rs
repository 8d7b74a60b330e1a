//! Calculation logic for the payroll engine.
//!
//! Pure functions only: input validation, net salary derivation and payroll
//! totals. Nothing here touches a store.

mod net_salary;
mod summary;
mod validation;

pub use net_salary::{NET_SALARY_CLAMPED, NetSalaryResult, calculate_net_salary};
pub use summary::{summarize, total_amount};
pub use validation::validate_payroll_input;
