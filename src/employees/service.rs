//! Employee management: creation with a linked account, updates, archiving
//! and search.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use crate::auth::PasswordStore;
use crate::config::AuthPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Employee, EmployeeId, EmployeeUpdate, NewAccount, NewEmployee, ROLE_ADMIN, ROLE_EMPLOYEE,
};
use crate::store::{AccountRepository, EmployeeRepository, StoreError};

const EMPLOYEE: &str = "Employee";

/// Shortest search term that runs a search.
pub const MIN_SEARCH_LENGTH: usize = 2;

/// Creates and maintains employee records and their login accounts.
pub struct EmployeeService {
    employees: Arc<dyn EmployeeRepository>,
    accounts: Arc<dyn AccountRepository>,
    passwords: Arc<dyn PasswordStore>,
    policy: AuthPolicy,
    // Serializes id allocation and uniqueness checks.
    writes: Mutex<()>,
}

impl EmployeeService {
    /// Creates a service over the given repositories and password store.
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        accounts: Arc<dyn AccountRepository>,
        passwords: Arc<dyn PasswordStore>,
        policy: AuthPolicy,
    ) -> Self {
        Self {
            employees,
            accounts,
            passwords,
            policy,
            writes: Mutex::new(()),
        }
    }

    /// Creates an employee and its login account, returning the new id.
    ///
    /// String fields are trimmed and the email lowercased. The account role
    /// is `admin` when the employee role label is `admin` in any case, and
    /// `employee` otherwise. If the account cannot be stored the employee
    /// record is removed again.
    ///
    /// # Errors
    ///
    /// `Validation` for missing or malformed fields, `Conflict` for a taken
    /// username or email, `Persistence` when the store fails.
    #[instrument(skip(self, new), fields(username = %new.username.trim()))]
    pub fn create_employee(&self, new: &NewEmployee) -> EngineResult<EmployeeId> {
        let new = normalized(new);
        self.check_new_employee(&new)?;
        let hashed = self.passwords.hash(&new.password)?;

        let _guard = self.writes.lock();

        if self.accounts.find_account_by_username(&new.username)?.is_some() {
            return Err(username_taken(&new.username));
        }
        if self.employees.find_employee_by_email(&new.email)?.is_some() {
            return Err(email_taken(&new.email));
        }

        let existing = self.employees.list_employees()?;
        let id = EmployeeId::next_after(existing.iter().map(|e| &e.id));

        self.employees
            .insert_employee(Employee {
                id: id.clone(),
                full_name: new.full_name,
                email: new.email,
                role: new.role.clone(),
                position: new.position,
                department: new.department,
                salary: new.salary,
                phone: new.phone,
                address: new.address,
                hire_date: new.hire_date.unwrap_or_else(|| Utc::now().date_naive()),
                is_archived: false,
            })
            .map_err(from_store)?;

        let role = if new.role.eq_ignore_ascii_case(ROLE_ADMIN) {
            ROLE_ADMIN
        } else {
            ROLE_EMPLOYEE
        };
        let account = NewAccount {
            username: new.username,
            password_hash: hashed.hash,
            salt: hashed.salt,
            role: role.to_string(),
            employee_id: Some(id.clone()),
        };
        if let Err(err) = self.accounts.insert_account(account) {
            warn!(employee_id = %id, error = %err, "account insert failed, removing employee");
            if let Err(rollback) = self.employees.delete_employee(&id) {
                error!(employee_id = %id, error = %rollback, "employee rollback failed");
            }
            return Err(from_store(err));
        }

        info!(employee_id = %id, role, "employee created");
        Ok(id)
    }

    /// Applies a partial update and returns the updated employee.
    #[instrument(skip(self, update))]
    pub fn update_employee(
        &self,
        id: &EmployeeId,
        update: &EmployeeUpdate,
    ) -> EngineResult<Employee> {
        if update.is_empty() {
            return Err(EngineError::validation("update", "No fields to update"));
        }
        check_update(update)?;

        let _guard = self.writes.lock();
        let mut employee = self.get_employee(id)?;

        if let Some(email) = &update.email {
            let email = email.trim().to_lowercase();
            if let Some(other) = self.employees.find_employee_by_email(&email)? {
                if &other.id != id {
                    return Err(email_taken(&email));
                }
            }
        }

        update.apply_to(&mut employee);
        self.employees
            .update_employee(employee.clone())
            .map_err(from_store)?;
        info!(employee_id = %id, "employee updated");
        Ok(employee)
    }

    /// Marks an employee as archived.
    pub fn archive_employee(&self, id: &EmployeeId) -> EngineResult<()> {
        self.set_archived(id, true)
    }

    /// Clears the archived flag of an employee.
    pub fn restore_employee(&self, id: &EmployeeId) -> EngineResult<()> {
        self.set_archived(id, false)
    }

    /// Finds active employees whose name, email or department contains
    /// `term`, ignoring case.
    ///
    /// Terms shorter than [`MIN_SEARCH_LENGTH`] after trimming return no
    /// results.
    pub fn search_employees(&self, term: &str) -> EngineResult<Vec<Employee>> {
        let term = term.trim();
        if term.chars().count() < MIN_SEARCH_LENGTH {
            return Ok(Vec::new());
        }
        Ok(self
            .list_employees(false)?
            .into_iter()
            .filter(|e| e.matches_search(term))
            .collect())
    }

    /// Number of employees that are not archived.
    pub fn active_employee_count(&self) -> EngineResult<usize> {
        Ok(self
            .employees
            .list_employees()?
            .iter()
            .filter(|e| e.is_active())
            .count())
    }

    /// Fetches an employee, archived or not.
    pub fn get_employee(&self, id: &EmployeeId) -> EngineResult<Employee> {
        self.employees
            .find_employee_by_id(id)?
            .ok_or_else(|| EngineError::not_found(EMPLOYEE, id))
    }

    /// Lists employees ordered by id.
    pub fn list_employees(&self, include_archived: bool) -> EngineResult<Vec<Employee>> {
        let mut employees = self.employees.list_employees()?;
        if !include_archived {
            employees.retain(Employee::is_active);
        }
        Ok(employees)
    }

    /// Permanently removes an employee record. Its account is left in place.
    #[instrument(skip(self))]
    pub fn delete_employee(&self, id: &EmployeeId) -> EngineResult<()> {
        if !self.employees.delete_employee(id)? {
            return Err(EngineError::not_found(EMPLOYEE, id));
        }
        warn!(employee_id = %id, "employee permanently deleted");
        Ok(())
    }

    fn set_archived(&self, id: &EmployeeId, archived: bool) -> EngineResult<()> {
        let _guard = self.writes.lock();
        let mut employee = self.get_employee(id)?;
        employee.is_archived = archived;
        self.employees.update_employee(employee).map_err(from_store)?;
        info!(employee_id = %id, archived, "employee archive flag changed");
        Ok(())
    }

    fn check_new_employee(&self, new: &NewEmployee) -> EngineResult<()> {
        let required = [
            ("username", &new.username, "Username is required"),
            ("password", &new.password, "Password is required"),
            ("full_name", &new.full_name, "Full name is required"),
            ("email", &new.email, "Email is required"),
            ("position", &new.position, "Position is required"),
            ("department", &new.department, "Department is required"),
        ];
        for (field, value, message) in required {
            if value.is_empty() {
                return Err(EngineError::validation(field, message));
            }
        }

        if new.password.chars().count() < self.policy.min_password_length {
            return Err(EngineError::validation(
                "password",
                format!(
                    "Password must be at least {} characters long",
                    self.policy.min_password_length
                ),
            ));
        }
        if !is_email(&new.email) {
            return Err(EngineError::validation("email", "Invalid email format"));
        }
        if new.salary <= Decimal::ZERO {
            return Err(EngineError::validation("salary", "Salary must be greater than 0"));
        }
        Ok(())
    }
}

fn normalized(new: &NewEmployee) -> NewEmployee {
    NewEmployee {
        username: new.username.trim().to_string(),
        password: new.password.clone(),
        full_name: new.full_name.trim().to_string(),
        email: new.email.trim().to_lowercase(),
        role: new.role.trim().to_string(),
        position: new.position.trim().to_string(),
        department: new.department.trim().to_string(),
        salary: new.salary,
        phone: new.phone.trim().to_string(),
        address: new.address.trim().to_string(),
        hire_date: new.hire_date,
    }
}

fn check_update(update: &EmployeeUpdate) -> EngineResult<()> {
    let required = [
        ("full_name", &update.full_name, "Full name is required"),
        ("email", &update.email, "Email is required"),
        ("position", &update.position, "Position is required"),
        ("department", &update.department, "Department is required"),
    ];
    for (field, value, message) in required {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(EngineError::validation(field, message));
        }
    }

    if update.email.as_deref().is_some_and(|e| !is_email(e.trim())) {
        return Err(EngineError::validation("email", "Invalid email format"));
    }
    if update.salary.is_some_and(|s| s < Decimal::ZERO) {
        return Err(EngineError::validation("salary", "Salary cannot be negative"));
    }
    Ok(())
}

fn is_email(email: &str) -> bool {
    email.contains('@') && email.contains('.')
}

fn username_taken(username: &str) -> EngineError {
    EngineError::Conflict {
        message: format!("Username '{}' is already taken", username),
    }
}

fn email_taken(email: &str) -> EngineError {
    EngineError::Conflict {
        message: format!("Email '{}' is already registered", email),
    }
}

fn from_store(err: StoreError) -> EngineError {
    match err {
        StoreError::Duplicate { field: "username", value } => username_taken(&value),
        StoreError::Duplicate { field: "email", value } => email_taken(&value),
        StoreError::Duplicate { field, value } => EngineError::Conflict {
            message: format!("Duplicate {}: {}", field, value),
        },
        other => other.into(),
    }
}
