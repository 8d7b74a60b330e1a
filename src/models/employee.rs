//! Employee model and the `E###` employee identifier.
//!
//! This module defines the [`Employee`] record, the [`EmployeeId`] newtype
//! with its sequential allocation rule, and the input types used to create
//! and update employees.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An externally visible employee identifier such as `E000` or `E042`.
///
/// Identifiers are free text when read back from a store; only identifiers
/// of the form `E` followed by digits take part in sequential allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// The prefix shared by all allocated identifiers.
    pub const PREFIX: char = 'E';

    /// Wraps an identifier string as-is.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Builds the identifier for a sequence number, zero padded to 3 digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use payease_engine::models::EmployeeId;
    ///
    /// assert_eq!(EmployeeId::from_number(0).as_str(), "E000");
    /// assert_eq!(EmployeeId::from_number(42).as_str(), "E042");
    /// assert_eq!(EmployeeId::from_number(1234).as_str(), "E1234");
    /// ```
    pub fn from_number(number: u64) -> Self {
        Self(format!("{}{:03}", Self::PREFIX, number))
    }

    /// Returns the numeric suffix when the identifier matches `E[0-9]+`.
    pub fn number(&self) -> Option<u64> {
        let digits = self.0.strip_prefix(Self::PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Allocates the identifier following the highest existing sequence number.
    ///
    /// Gaps are never filled: the result is always max + 1, or `E000` when no
    /// existing identifier carries a sequence number.
    ///
    /// # Examples
    ///
    /// ```
    /// use payease_engine::models::EmployeeId;
    ///
    /// let existing = vec![
    ///     EmployeeId::new("E000"),
    ///     EmployeeId::new("E001"),
    ///     EmployeeId::new("E003"),
    /// ];
    /// assert_eq!(EmployeeId::next_after(&existing).as_str(), "E004");
    /// ```
    pub fn next_after<'a, I>(existing: I) -> Self
    where
        I: IntoIterator<Item = &'a EmployeeId>,
    {
        let next = existing
            .into_iter()
            .filter_map(EmployeeId::number)
            .max()
            .map_or(0, |max| max.saturating_add(1));
        Self::from_number(next)
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmployeeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// An employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique, externally visible identifier.
    pub id: EmployeeId,
    /// Full name.
    pub full_name: String,
    /// Email address, stored lowercase; unique across active and archived employees.
    pub email: String,
    /// Free-text role label (e.g. "Employee", "Admin").
    pub role: String,
    /// Job position.
    pub position: String,
    /// Department.
    pub department: String,
    /// Monthly salary; never negative.
    pub salary: Decimal,
    /// Phone number.
    #[serde(default)]
    pub phone: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Date of hire.
    pub hire_date: NaiveDate,
    /// Soft-delete flag.
    #[serde(default)]
    pub is_archived: bool,
}

impl Employee {
    /// Returns true when the record is not archived.
    pub fn is_active(&self) -> bool {
        !self.is_archived
    }

    /// Case-insensitive substring match over name, email and department.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.full_name, &self.email, &self.department]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Input for the employee creation workflow.
///
/// The account credentials travel with the employee details because both
/// records are created together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Login username for the linked account.
    pub username: String,
    /// Plaintext password; hashed before it reaches the store.
    pub password: String,
    /// Full name.
    pub full_name: String,
    /// Email address.
    pub email: String,
    /// Role label; `admin` (any case) yields an admin account.
    pub role: String,
    /// Job position.
    pub position: String,
    /// Department.
    pub department: String,
    /// Monthly salary.
    pub salary: Decimal,
    /// Phone number.
    #[serde(default)]
    pub phone: String,
    /// Postal address.
    #[serde(default)]
    pub address: String,
    /// Date of hire; today when absent.
    #[serde(default)]
    pub hire_date: Option<NaiveDate>,
}

/// A partial update to an employee; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeUpdate {
    /// New full name.
    pub full_name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New role label.
    pub role: Option<String>,
    /// New position.
    pub position: Option<String>,
    /// New department.
    pub department: Option<String>,
    /// New salary.
    pub salary: Option<Decimal>,
    /// New phone number.
    pub phone: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New hire date.
    pub hire_date: Option<NaiveDate>,
}

impl EmployeeUpdate {
    /// Returns true when no field is set.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.email.is_none()
            && self.role.is_none()
            && self.position.is_none()
            && self.department.is_none()
            && self.salary.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.hire_date.is_none()
    }

    /// Applies the set fields to an employee, trimming strings and
    /// lowercasing the email.
    pub fn apply_to(&self, employee: &mut Employee) {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(value) = value {
                *target = value.trim().to_string();
            }
        }

        set(&mut employee.full_name, &self.full_name);
        set(&mut employee.role, &self.role);
        set(&mut employee.position, &self.position);
        set(&mut employee.department, &self.department);
        set(&mut employee.phone, &self.phone);
        set(&mut employee.address, &self.address);
        if let Some(email) = &self.email {
            employee.email = email.trim().to_lowercase();
        }
        if let Some(salary) = self.salary {
            employee.salary = salary;
        }
        if let Some(hire_date) = self.hire_date {
            employee.hire_date = hire_date;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<EmployeeId> {
        raw.iter().map(|s| EmployeeId::new(*s)).collect()
    }

    fn create_test_employee() -> Employee {
        Employee {
            id: EmployeeId::new("E001"),
            full_name: "Maria Santos".to_string(),
            email: "maria@payease.test".to_string(),
            role: "Employee".to_string(),
            position: "Accountant".to_string(),
            department: "Finance".to_string(),
            salary: Decimal::new(2500000, 2),
            phone: "0917".to_string(),
            address: "Cebu".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            is_archived: false,
        }
    }

    #[test]
    fn test_next_id_skips_gaps() {
        let existing = ids(&["E000", "E001", "E003"]);
        assert_eq!(EmployeeId::next_after(&existing).as_str(), "E004");
    }

    #[test]
    fn test_next_id_starts_at_e000() {
        assert_eq!(EmployeeId::next_after(&[]).as_str(), "E000");
    }

    #[test]
    fn test_next_id_ignores_non_sequential_ids() {
        let existing = ids(&["ADMIN", "E", "E12a", "X999", "E002"]);
        assert_eq!(EmployeeId::next_after(&existing).as_str(), "E003");
    }

    #[test]
    fn test_next_id_uses_numeric_not_lexical_order() {
        let existing = ids(&["E999", "E1000", "E0998"]);
        assert_eq!(EmployeeId::next_after(&existing).as_str(), "E1001");
    }

    #[test]
    fn test_number_parses_suffix() {
        assert_eq!(EmployeeId::new("E007").number(), Some(7));
        assert_eq!(EmployeeId::new("e007").number(), None);
        assert_eq!(EmployeeId::new("E-07").number(), None);
    }

    #[test]
    fn test_employee_id_serializes_as_string() {
        let json = serde_json::to_string(&EmployeeId::new("E005")).unwrap();
        assert_eq!(json, "\"E005\"");
    }

    #[test]
    fn test_matches_search_is_case_insensitive() {
        let employee = create_test_employee();
        assert!(employee.matches_search("MARIA"));
        assert!(employee.matches_search("payease"));
        assert!(employee.matches_search("fin"));
        assert!(!employee.matches_search("Cebu"));
    }

    #[test]
    fn test_update_applies_only_set_fields() {
        let mut employee = create_test_employee();
        let update = EmployeeUpdate {
            email: Some("  Maria.S@PayEase.test ".to_string()),
            salary: Some(Decimal::new(3000000, 2)),
            ..Default::default()
        };

        update.apply_to(&mut employee);

        assert_eq!(employee.email, "maria.s@payease.test");
        assert_eq!(employee.salary, Decimal::new(3000000, 2));
        assert_eq!(employee.full_name, "Maria Santos");
        assert!(!update.is_empty());
        assert!(EmployeeUpdate::default().is_empty());
    }

    #[test]
    fn test_deserialize_employee_defaults_optional_fields() {
        let json = r#"{
            "id": "E010",
            "full_name": "Jose Rizal",
            "email": "jose@payease.test",
            "role": "Admin",
            "position": "Manager",
            "department": "HR",
            "salary": "40000.00",
            "hire_date": "2024-01-15"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id.as_str(), "E010");
        assert_eq!(employee.salary, Decimal::new(4000000, 2));
        assert!(employee.phone.is_empty());
        assert!(employee.is_active());
    }
}
