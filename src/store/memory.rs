//! In-memory store backing every repository trait.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Datelike, Utc};
use parking_lot::RwLock;

use super::{
    AccountRepository, AttendanceSummary, EmployeeRepository, PayrollRepository, StoreError,
    StoreResult,
};
use crate::models::{
    Account, AttendanceRecord, Employee, EmployeeId, LoginState, NewAccount, PayrollRecord,
    PayrollStatus,
};

/// A thread-safe store holding all tables in memory.
///
/// Each table sits behind its own `RwLock`, so a write to one row is atomic
/// with respect to every other reader and writer of that table. Calling
/// [`set_available(false)`](Self::set_available) makes every operation fail
/// with [`StoreError::Unavailable`].
#[derive(Debug)]
pub struct InMemoryStore {
    accounts: RwLock<BTreeMap<u64, Account>>,
    employees: RwLock<BTreeMap<EmployeeId, Employee>>,
    payroll: RwLock<BTreeMap<u64, PayrollRecord>>,
    attendance: RwLock<Vec<AttendanceRecord>>,
    next_account_id: AtomicU64,
    next_payroll_id: AtomicU64,
    available: AtomicBool,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Creates an empty, available store.
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(BTreeMap::new()),
            employees: RwLock::new(BTreeMap::new()),
            payroll: RwLock::new(BTreeMap::new()),
            attendance: RwLock::new(Vec::new()),
            next_account_id: AtomicU64::new(1),
            next_payroll_id: AtomicU64::new(1),
            available: AtomicBool::new(true),
        }
    }

    /// Simulates losing or regaining the backing store.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Records one day of attendance.
    pub fn add_attendance(&self, record: AttendanceRecord) -> StoreResult<()> {
        self.check()?;
        self.attendance.write().push(record);
        Ok(())
    }

    fn check(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("in-memory store is offline".to_string()))
        }
    }
}

impl AccountRepository for InMemoryStore {
    fn find_account_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        self.check()?;
        Ok(self
            .accounts
            .read()
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    fn find_account_by_employee(&self, employee_id: &EmployeeId) -> StoreResult<Option<Account>> {
        self.check()?;
        Ok(self
            .accounts
            .read()
            .values()
            .find(|a| a.employee_id.as_ref() == Some(employee_id))
            .cloned())
    }

    fn insert_account(&self, account: NewAccount) -> StoreResult<u64> {
        self.check()?;
        let mut accounts = self.accounts.write();
        if accounts.values().any(|a| a.username == account.username) {
            return Err(StoreError::Duplicate {
                field: "username",
                value: account.username,
            });
        }

        let id = self.next_account_id.fetch_add(1, Ordering::SeqCst);
        accounts.insert(
            id,
            Account {
                id,
                username: account.username,
                password_hash: account.password_hash,
                salt: account.salt,
                role: account.role,
                employee_id: account.employee_id,
                last_login: None,
                failed_login_attempts: 0,
                is_locked: false,
            },
        );
        Ok(id)
    }

    fn update_login_state(&self, account_id: u64, state: LoginState) -> StoreResult<()> {
        self.check()?;
        let mut accounts = self.accounts.write();
        let account = accounts.get_mut(&account_id).ok_or(StoreError::Missing {
            entity: "account",
            id: account_id.to_string(),
        })?;
        account.last_login = state.last_login;
        account.failed_login_attempts = state.failed_attempts;
        account.is_locked = state.is_locked;
        Ok(())
    }
}

impl EmployeeRepository for InMemoryStore {
    fn find_employee_by_id(&self, id: &EmployeeId) -> StoreResult<Option<Employee>> {
        self.check()?;
        Ok(self.employees.read().get(id).cloned())
    }

    fn find_employee_by_email(&self, email: &str) -> StoreResult<Option<Employee>> {
        self.check()?;
        Ok(self
            .employees
            .read()
            .values()
            .find(|e| e.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn list_employees(&self) -> StoreResult<Vec<Employee>> {
        self.check()?;
        Ok(self.employees.read().values().cloned().collect())
    }

    fn insert_employee(&self, employee: Employee) -> StoreResult<()> {
        self.check()?;
        let mut employees = self.employees.write();
        if employees.contains_key(&employee.id) {
            return Err(StoreError::Duplicate {
                field: "employee_id",
                value: employee.id.to_string(),
            });
        }
        if employees
            .values()
            .any(|e| e.email.eq_ignore_ascii_case(&employee.email))
        {
            return Err(StoreError::Duplicate {
                field: "email",
                value: employee.email,
            });
        }
        employees.insert(employee.id.clone(), employee);
        Ok(())
    }

    fn update_employee(&self, employee: Employee) -> StoreResult<()> {
        self.check()?;
        let mut employees = self.employees.write();
        if employees
            .values()
            .any(|e| e.id != employee.id && e.email.eq_ignore_ascii_case(&employee.email))
        {
            return Err(StoreError::Duplicate {
                field: "email",
                value: employee.email,
            });
        }
        match employees.get_mut(&employee.id) {
            Some(existing) => {
                *existing = employee;
                Ok(())
            }
            None => Err(StoreError::Missing {
                entity: "employee",
                id: employee.id.to_string(),
            }),
        }
    }

    fn delete_employee(&self, id: &EmployeeId) -> StoreResult<bool> {
        self.check()?;
        Ok(self.employees.write().remove(id).is_some())
    }
}

impl PayrollRepository for InMemoryStore {
    fn insert_payroll(&self, mut record: PayrollRecord) -> StoreResult<u64> {
        self.check()?;
        let id = self.next_payroll_id.fetch_add(1, Ordering::SeqCst);
        record.id = Some(id);
        self.payroll.write().insert(id, record);
        Ok(id)
    }

    fn find_payroll(&self, id: u64) -> StoreResult<Option<PayrollRecord>> {
        self.check()?;
        Ok(self.payroll.read().get(&id).cloned())
    }

    fn update_payroll_status(
        &self,
        id: u64,
        status: PayrollStatus,
        released_date: Option<DateTime<Utc>>,
    ) -> StoreResult<bool> {
        self.check()?;
        match self.payroll.write().get_mut(&id) {
            Some(record) => {
                record.status = status;
                record.released_date = released_date;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn find_all_payroll(&self) -> StoreResult<Vec<PayrollRecord>> {
        self.check()?;
        Ok(self.payroll.read().values().cloned().collect())
    }

    fn find_payroll_by_employee(&self, employee_id: &EmployeeId) -> StoreResult<Vec<PayrollRecord>> {
        self.check()?;
        Ok(self
            .payroll
            .read()
            .values()
            .filter(|r| &r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn delete_payroll(&self, id: u64) -> StoreResult<bool> {
        self.check()?;
        Ok(self.payroll.write().remove(&id).is_some())
    }
}

impl AttendanceSummary for InMemoryStore {
    fn count_present_days(
        &self,
        employee_id: &EmployeeId,
        month: Option<u32>,
        year: Option<i32>,
    ) -> StoreResult<u32> {
        self.check()?;
        let period = month.zip(year);
        let count = self
            .attendance
            .read()
            .iter()
            .filter(|r| &r.employee_id == employee_id && r.status.counts_as_present())
            .filter(|r| match period {
                Some((m, y)) => r.date.month() == m && r.date.year() == y,
                None => true,
            })
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}
