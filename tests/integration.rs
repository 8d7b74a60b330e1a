//! Integration tests for the PayEase engine.
//!
//! These tests drive the public API end to end against the in-memory store:
//! - Login lockout and administrative unlock
//! - Archived employees and role-gated login
//! - Payroll calculation examples and the status state machine
//! - Attendance-sourced payroll
//! - Employee ID allocation
//! - Concurrent login attempts on one account
//! - Store outages

use std::str::FromStr;
use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use payease_engine::auth::{Argon2PasswordStore, AuthEngine, PasswordStore};
use payease_engine::config::ConfigLoader;
use payease_engine::employees::EmployeeService;
use payease_engine::error::EngineError;
use payease_engine::models::{
    AttendanceRecord, AttendanceStatus, Dashboard, Employee, EmployeeId, NewEmployee,
    PayrollForm, PayrollInput, PayrollStatus,
};
use payease_engine::payroll::PayrollEngine;
use payease_engine::store::{AccountRepository, EmployeeRepository, InMemoryStore};

// =============================================================================
// Test Helpers
// =============================================================================

struct TestSystem {
    store: Arc<InMemoryStore>,
    auth: AuthEngine,
    payroll: PayrollEngine,
    employees: EmployeeService,
}

fn create_test_system() -> TestSystem {
    let config = ConfigLoader::load("./config/payease").expect("Failed to load config");
    let store = Arc::new(InMemoryStore::new());
    let passwords: Arc<dyn PasswordStore> = Arc::new(
        Argon2PasswordStore::with_cost(config.auth().min_password_length, 1024, 1, 1)
            .expect("Failed to build password store"),
    );

    TestSystem {
        auth: AuthEngine::new(
            store.clone(),
            store.clone(),
            passwords.clone(),
            config.auth().clone(),
        ),
        payroll: PayrollEngine::new(store.clone(), store.clone(), config.payroll().clone()),
        employees: EmployeeService::new(
            store.clone(),
            store.clone(),
            passwords,
            config.auth().clone(),
        ),
        store,
    }
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn new_employee(username: &str, email: &str, role: &str) -> NewEmployee {
    NewEmployee {
        username: username.to_string(),
        password: "payease123".to_string(),
        full_name: format!("{} Tester", username),
        email: email.to_string(),
        role: role.to_string(),
        position: "Analyst".to_string(),
        department: "Finance".to_string(),
        salary: decimal("22000"),
        phone: "09170000000".to_string(),
        address: "Manila".to_string(),
        hire_date: NaiveDate::from_ymd_opt(2023, 1, 9),
    }
}

fn payroll_input(employee: &str, base: &str, days: u32, bonus: &str, deductions: &str) -> PayrollInput {
    PayrollInput {
        employee_id: EmployeeId::new(employee),
        month: 6,
        year: 2025,
        base_salary: decimal(base),
        bonus: decimal(bonus),
        deductions: decimal(deductions),
        present_days: days,
        status: None,
        notes: String::new(),
        released_date: None,
    }
}

fn seed_employee(store: &InMemoryStore, id: &str) {
    store
        .insert_employee(Employee {
            id: EmployeeId::new(id),
            full_name: "Seeded".to_string(),
            email: format!("{}@payease.test", id.to_lowercase()),
            role: "Employee".to_string(),
            position: "Clerk".to_string(),
            department: "Operations".to_string(),
            salary: decimal("15000"),
            phone: String::new(),
            address: String::new(),
            hire_date: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
            is_archived: false,
        })
        .unwrap();
}

// =============================================================================
// Authentication
// =============================================================================

#[test]
fn test_ghost_user_gets_invalid_credentials() {
    let system = create_test_system();
    let err = system.auth.login("ghost", "anything").unwrap_err();
    assert!(matches!(err, EngineError::InvalidCredentials));
    assert_eq!(err.to_string(), "Invalid credentials");
}

#[test]
fn test_lockout_after_five_failures_then_unlock() {
    let system = create_test_system();
    system
        .employees
        .create_employee(&new_employee("maria", "maria@payease.test", "Employee"))
        .unwrap();

    for attempt in 1..=5 {
        let err = system.auth.login("maria", "wrong-password").unwrap_err();
        assert!(
            matches!(err, EngineError::InvalidCredentials),
            "attempt {} should fail as invalid credentials",
            attempt
        );
    }
    let account = system.store.find_account_by_username("maria").unwrap().unwrap();
    assert_eq!(account.failed_login_attempts, 5);
    assert!(account.is_locked);

    // Sixth attempt with the correct password still fails.
    let err = system.auth.login("maria", "payease123").unwrap_err();
    assert!(matches!(err, EngineError::AccountLocked));
    // Same wording as an unknown user.
    assert_eq!(err.to_string(), "Invalid credentials");

    system.auth.unlock_account("maria").unwrap();
    let session = system.auth.login("maria", "payease123").unwrap();
    assert_eq!(session.username, "maria");

    let account = system.store.find_account_by_username("maria").unwrap().unwrap();
    assert_eq!(account.failed_login_attempts, 0);
    assert!(!account.is_locked);
    assert!(account.last_login.is_some());
}

#[test]
fn test_employee_session_profile_and_dashboard() {
    let system = create_test_system();
    let id = system
        .employees
        .create_employee(&new_employee("maria", "maria@payease.test", "Employee"))
        .unwrap();

    let session = system.auth.login("maria@payease.test", "payease123").unwrap();
    assert_eq!(session.employee_id.as_ref(), Some(&id));
    assert_eq!(session.display_name, "maria Tester");
    assert_eq!(session.position.as_deref(), Some("Analyst"));
    assert_eq!(session.salary, Some(decimal("22000")));
    assert_eq!(system.auth.resolve_dashboard(&session), Dashboard::Employee);
}

#[test]
fn test_archived_employee_blocked_but_admin_allowed() {
    let system = create_test_system();
    let staff = system
        .employees
        .create_employee(&new_employee("maria", "maria@payease.test", "Employee"))
        .unwrap();
    let admin = system
        .employees
        .create_employee(&new_employee("chief", "chief@payease.test", "Admin"))
        .unwrap();

    system.employees.archive_employee(&staff).unwrap();
    system.employees.archive_employee(&admin).unwrap();

    let err = system.auth.login("maria", "payease123").unwrap_err();
    assert!(matches!(err, EngineError::InvalidCredentials));

    let session = system.auth.login("chief", "payease123").unwrap();
    assert_eq!(session.dashboard(), Dashboard::Admin);
    assert_eq!(session.employee_id.as_ref(), Some(&admin));
    assert_eq!(session.display_name, "chief Tester");
    assert_eq!(session.department.as_deref(), Some("Finance"));

    system.employees.restore_employee(&staff).unwrap();
    assert!(system.auth.login("maria", "payease123").is_ok());
}

#[test]
fn test_concurrent_wrong_passwords_are_all_counted() {
    let system = Arc::new(create_test_system());
    system
        .employees
        .create_employee(&new_employee("maria", "maria@payease.test", "Employee"))
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let system = Arc::clone(&system);
            thread::spawn(move || {
                let _ = system.auth.login("maria", "wrong-password");
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let account = system.store.find_account_by_username("maria").unwrap().unwrap();
    assert_eq!(account.failed_login_attempts, 4);
    assert!(!account.is_locked);
}

#[test]
fn test_concurrent_wrong_passwords_lock_at_exactly_five() {
    let system = Arc::new(create_test_system());
    system
        .employees
        .create_employee(&new_employee("maria", "maria@payease.test", "Employee"))
        .unwrap();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let system = Arc::clone(&system);
            thread::spawn(move || system.auth.login("maria", "wrong-password").unwrap_err())
        })
        .collect();
    let errors: Vec<EngineError> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let counted = errors
        .iter()
        .filter(|e| matches!(e, EngineError::InvalidCredentials))
        .count();
    assert_eq!(counted, 5);
    let account = system.store.find_account_by_username("maria").unwrap().unwrap();
    assert_eq!(account.failed_login_attempts, 5);
    assert!(account.is_locked);
}

#[test]
fn test_credential_format_rules() {
    let system = create_test_system();
    assert!(system.auth.validate_credential_format("abc", "123456").is_ok());
    assert_eq!(
        system
            .auth
            .validate_credential_format("ab", "123456")
            .unwrap_err()
            .to_string(),
        "Username must be at least 3 characters"
    );
}

// =============================================================================
// Payroll
// =============================================================================

#[test]
fn test_payroll_example_full_month() {
    let system = create_test_system();
    let id = system
        .payroll
        .create(&payroll_input("E001", "22000", 20, "500", "300"))
        .unwrap();

    let record = system.payroll.get(id).unwrap();
    assert_eq!(record.net_salary, decimal("20200.00"));
    assert_eq!(record.status, PayrollStatus::Pending);
    assert!(record.released_date.is_none());
}

#[test]
fn test_payroll_over_deduction_clamps_to_zero() {
    let system = create_test_system();
    let id = system
        .payroll
        .create(&payroll_input("E001", "10000", 0, "0", "5000"))
        .unwrap();
    assert_eq!(system.payroll.get(id).unwrap().net_salary, Decimal::ZERO);
}

#[test]
fn test_payroll_form_to_record() {
    let system = create_test_system();
    let form = PayrollForm {
        employee_id: "E001".to_string(),
        month: "6".to_string(),
        year: "2025".to_string(),
        base_salary: "22000".to_string(),
        bonus: String::new(),
        deductions: String::new(),
        present_days: "11".to_string(),
        notes: "half month".to_string(),
    };
    let id = system.payroll.create(&form.parse().unwrap()).unwrap();
    let record = system.payroll.get(id).unwrap();
    assert_eq!(record.net_salary, decimal("11000"));
    assert_eq!(record.notes, "half month");

    let bad = PayrollForm {
        present_days: "eleven".to_string(),
        ..form
    };
    assert_eq!(bad.parse().unwrap_err().to_string(), "Invalid present days format");
}

#[test]
fn test_payroll_state_machine() {
    let system = create_test_system();
    let id = system
        .payroll
        .create(&payroll_input("E001", "22000", 22, "0", "0"))
        .unwrap();

    let released = system.payroll.release(id).unwrap();
    assert!(released.released_date.is_some());

    let canceled = system.payroll.cancel(id).unwrap();
    assert_eq!(canceled.status, PayrollStatus::Canceled);
    assert_eq!(canceled.released_date, released.released_date);

    let err = system.payroll.release(id).unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));
    assert_eq!(system.payroll.get(id).unwrap().status, PayrollStatus::Canceled);

    system.payroll.set_pending(id).unwrap();
    system.payroll.set_pending(id).unwrap();
    assert_eq!(system.payroll.get(id).unwrap().status, PayrollStatus::Pending);
}

#[test]
fn test_payroll_from_attendance() {
    let system = create_test_system();
    let id = system
        .employees
        .create_employee(&new_employee("maria", "maria@payease.test", "Employee"))
        .unwrap();

    for day in 2..=11 {
        let status = match day {
            2..=6 => AttendanceStatus::Present,
            7 | 8 => AttendanceStatus::Late,
            9 => AttendanceStatus::HalfDay,
            _ => AttendanceStatus::Absent,
        };
        system
            .store
            .add_attendance(AttendanceRecord {
                employee_id: id.clone(),
                date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
                clock_in: None,
                clock_out: None,
                status,
            })
            .unwrap();
    }

    let mut input = payroll_input(id.as_str(), "22000", 0, "0", "0");
    input.present_days = 0;
    let record_id = system.payroll.create_from_attendance(&input).unwrap();

    let record = system.payroll.get(record_id).unwrap();
    assert_eq!(record.present_days, 8);
    assert_eq!(record.net_salary, decimal("8000"));
}

#[test]
fn test_payroll_summary_and_listing() {
    let system = create_test_system();
    let a = system
        .payroll
        .create(&payroll_input("E001", "22000", 20, "500", "300"))
        .unwrap();
    let b = system
        .payroll
        .create(&payroll_input("E002", "11000", 22, "0", "1000"))
        .unwrap();
    system
        .payroll
        .create(&payroll_input("E001", "10000", 0, "0", "5000"))
        .unwrap();
    system.payroll.release(a).unwrap();
    system.payroll.cancel(b).unwrap();

    let records = system.payroll.list_all().unwrap();
    let summary = system.payroll.summary(&records);
    assert_eq!(summary.total_records, 3);
    assert_eq!(summary.total_amount, decimal("30200"));
    assert_eq!(summary.pending_count, 1);
    assert_eq!(summary.released_count, 1);
    assert_eq!(summary.canceled_count, 1);

    let for_e001 = system
        .payroll
        .list_for_employee(&EmployeeId::new("E001"))
        .unwrap();
    assert_eq!(for_e001.len(), 2);
}

// =============================================================================
// Employees
// =============================================================================

#[test]
fn test_employee_id_allocation_skips_gaps() {
    let system = create_test_system();
    for id in ["E000", "E001", "E003"] {
        seed_employee(&system.store, id);
    }

    let id = system
        .employees
        .create_employee(&new_employee("maria", "maria@payease.test", "Employee"))
        .unwrap();
    assert_eq!(id.as_str(), "E004");
}

#[test]
fn test_duplicate_username_message() {
    let system = create_test_system();
    system
        .employees
        .create_employee(&new_employee("maria", "maria@payease.test", "Employee"))
        .unwrap();

    let err = system
        .employees
        .create_employee(&new_employee("maria", "other@payease.test", "Employee"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Username 'maria' is already taken");
}

// =============================================================================
// Store outages
// =============================================================================

#[test]
fn test_store_outage_surfaces_as_persistence_error() {
    let system = create_test_system();
    system
        .employees
        .create_employee(&new_employee("maria", "maria@payease.test", "Employee"))
        .unwrap();
    let id = system
        .payroll
        .create(&payroll_input("E000", "22000", 20, "0", "0"))
        .unwrap();

    system.store.set_available(false);
    assert!(matches!(
        system.auth.login("maria", "payease123"),
        Err(EngineError::Persistence { .. })
    ));
    assert!(matches!(
        system.payroll.release(id),
        Err(EngineError::Persistence { .. })
    ));

    system.store.set_available(true);
    let record = system.payroll.get(id).unwrap();
    assert_eq!(record.status, PayrollStatus::Pending);
    let account = system.store.find_account_by_username("maria").unwrap().unwrap();
    assert_eq!(account.failed_login_attempts, 0);
}
