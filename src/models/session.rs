//! Session descriptor returned by a successful login.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Account, Employee, EmployeeId, ROLE_ADMIN, ROLE_EMPLOYEE};

/// Placeholder shown for profile fields an account does not have.
pub const NOT_APPLICABLE: &str = "N/A";

/// The dashboard a session is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dashboard {
    /// Administrator dashboard.
    Admin,
    /// Employee self-service dashboard.
    Employee,
    /// No dashboard for this role.
    Unknown,
}

impl Dashboard {
    /// Resolves a role string, compared case-insensitively.
    ///
    /// # Example
    ///
    /// ```
    /// use payease_engine::models::Dashboard;
    ///
    /// assert_eq!(Dashboard::for_role("ADMIN"), Dashboard::Admin);
    /// assert_eq!(Dashboard::for_role("auditor"), Dashboard::Unknown);
    /// ```
    pub fn for_role(role: &str) -> Self {
        if role.eq_ignore_ascii_case(ROLE_ADMIN) {
            Self::Admin
        } else if role.eq_ignore_ascii_case(ROLE_EMPLOYEE) {
            Self::Employee
        } else {
            Self::Unknown
        }
    }

    /// Returns `"admin"`, `"employee"` or `"unknown"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role-resolved user profile produced by a successful login.
///
/// Profile fields come from the linked employee record; accounts without one
/// carry `None` there and use the username as display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Identifier of this login session.
    pub session_id: Uuid,
    /// When the session was opened.
    pub logged_in_at: DateTime<Utc>,
    /// Account username.
    pub username: String,
    /// Account role.
    pub role: String,
    /// Employee the session belongs to; `None` for accounts without a
    /// loaded employee profile.
    pub employee_id: Option<EmployeeId>,
    /// Employee full name, or the username.
    pub display_name: String,
    /// Employee email.
    pub email: Option<String>,
    /// Employee position.
    pub position: Option<String>,
    /// Employee department.
    pub department: Option<String>,
    /// Employee salary.
    pub salary: Option<Decimal>,
    /// Employee phone.
    pub phone: Option<String>,
    /// Employee address.
    pub address: Option<String>,
    /// Employee hire date.
    pub hire_date: Option<NaiveDate>,
}

impl SessionInfo {
    /// Builds the session for an account and its linked employee record.
    pub fn open(account: &Account, employee: Option<&Employee>, now: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            logged_in_at: now,
            username: account.username.clone(),
            role: account.role.clone(),
            employee_id: employee.map(|e| e.id.clone()),
            display_name: employee
                .map(|e| e.full_name.clone())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| account.username.clone()),
            email: employee.map(|e| e.email.clone()),
            position: employee.map(|e| e.position.clone()),
            department: employee.map(|e| e.department.clone()),
            salary: employee.map(|e| e.salary),
            phone: employee.map(|e| e.phone.clone()),
            address: employee.map(|e| e.address.clone()),
            hire_date: employee.map(|e| e.hire_date),
        }
    }

    /// Returns the employee id, or [`NOT_APPLICABLE`] for accounts without one.
    pub fn employee_id_label(&self) -> &str {
        self.employee_id
            .as_ref()
            .map_or(NOT_APPLICABLE, EmployeeId::as_str)
    }

    /// Returns the dashboard this session routes to.
    pub fn dashboard(&self) -> Dashboard {
        Dashboard::for_role(&self.role)
    }
}
