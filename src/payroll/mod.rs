//! Payroll lifecycle.
//!
//! [`PayrollEngine`] validates and computes monthly payroll, stores it, and
//! moves records between `Pending`, `Released` and `Canceled`.

mod engine;

pub use engine::PayrollEngine;
