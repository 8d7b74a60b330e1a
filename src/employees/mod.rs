//! Employee records and their login accounts.

mod service;

pub use service::{EmployeeService, MIN_SEARCH_LENGTH};
