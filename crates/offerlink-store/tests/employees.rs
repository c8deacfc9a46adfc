use offerlink_core::domain::EmployeeStatus;
use offerlink_core::{find_match, Candidate, CoreError};
use offerlink_store::error::{StoreError, StoreErrorKind};
use offerlink_store::repo::EmployeeNew;
use offerlink_store::Store;
use tempfile::TempDir;

fn open_store() -> Store {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store
}

fn new_employee(number: &str, first: &str, last: &str, email: &str, phone: &str) -> EmployeeNew {
    EmployeeNew {
        employee_number: number.to_string(),
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        email: Some(email.to_string()),
        phone_number: Some(phone.to_string()),
        status: EmployeeStatus::Active,
    }
}

#[test]
fn upsert_inserts_then_updates() {
    let store = open_store();
    let now = 1_700_000_000;

    let created = store
        .employees()
        .upsert(now, new_employee("E1", "Jane", "Doe", "jane@x.com", "(555) 123-4567"))
        .expect("insert");
    assert_eq!(created.employee.employee_number, "E1");
    assert_eq!(created.created_at, now);
    assert_eq!(created.status, EmployeeStatus::Active);

    let mut changed = new_employee("E1", "Jane", "Smith", "jane@x.com", "(555) 123-4567");
    changed.status = EmployeeStatus::Leave;
    let updated = store.employees().upsert(now + 60, changed).expect("update");
    assert_eq!(updated.employee.last_name.as_deref(), Some("Smith"));
    assert_eq!(updated.status, EmployeeStatus::Leave);
    assert_eq!(updated.created_at, now);
    assert_eq!(updated.updated_at, now + 60);

    assert_eq!(store.employees().list_all().expect("list").len(), 1);
}

#[test]
fn upsert_rejects_blank_employee_number() {
    let store = open_store();
    let err = store
        .employees()
        .upsert(1, new_employee("  ", "Jane", "Doe", "jane@x.com", ""))
        .unwrap_err();
    assert!(matches!(err, StoreError::Core(CoreError::EmptyEmployeeNumber)));
    assert_eq!(err.kind(), StoreErrorKind::Core);
}

#[test]
fn list_active_excludes_terminated_and_orders_by_number() {
    let store = open_store();
    let now = 1_700_000_000;
    let imported = store
        .employees()
        .import(
            now,
            vec![
                new_employee("E3", "Cara", "Three", "c@x.com", ""),
                new_employee("E1", "Ann", "One", "a@x.com", ""),
                EmployeeNew {
                    status: EmployeeStatus::Terminated,
                    ..new_employee("E2", "Bob", "Two", "b@x.com", "")
                },
                EmployeeNew {
                    status: EmployeeStatus::Leave,
                    ..new_employee("E4", "Dee", "Four", "d@x.com", "")
                },
            ],
        )
        .expect("import");
    assert_eq!(imported, 4);

    let active = store.employees().list_active().expect("list active");
    let numbers: Vec<&str> = active.iter().map(|e| e.employee_number.as_str()).collect();
    assert_eq!(numbers, vec!["E1", "E3", "E4"]);
    assert_eq!(store.employees().count_active().expect("count"), 3);
}

#[test]
fn import_is_all_or_nothing() {
    let store = open_store();
    let result = store.employees().import(
        1,
        vec![
            new_employee("E1", "Ann", "One", "a@x.com", ""),
            new_employee("", "Bad", "Row", "", ""),
        ],
    );
    assert!(result.is_err());
    assert!(store.employees().list_all().expect("list").is_empty());
}

#[test]
fn set_status_terminates_and_reports_missing() {
    let store = open_store();
    store
        .employees()
        .upsert(1, new_employee("E1", "Ann", "One", "a@x.com", ""))
        .expect("insert");

    store
        .employees()
        .set_status(2, "E1", EmployeeStatus::Terminated)
        .expect("terminate");
    assert!(store.employees().list_active().expect("list").is_empty());
    let entry = store.employees().get("E1").expect("get").expect("exists");
    assert_eq!(entry.status, EmployeeStatus::Terminated);

    let err = store
        .employees()
        .set_status(3, "E9", EmployeeStatus::Active)
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::NotFound);
}

#[test]
fn active_directory_feeds_matcher() {
    let store = open_store();
    store
        .employees()
        .import(
            1,
            vec![
                new_employee("E1", "Jane", "Doe", "jane@x.com", "(555) 123-4567"),
                new_employee("E2", "Jane", "Doe", "other@x.com", "(999) 999-9999"),
            ],
        )
        .expect("import");

    let employees = store.employees().list_active().expect("list");
    let candidate = Candidate {
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
        email: Some("jane@x.com".to_string()),
        home_phone: Some("555-123-4567".to_string()),
        ..Default::default()
    };
    let found = find_match(&candidate, &employees).expect("match");
    assert_eq!(found.employee_number(), "E1");
}

#[test]
fn file_backed_store_persists_rows() {
    let temp = TempDir::new().expect("tempdir");
    let path = temp.path().join("directory.sqlite3");
    {
        let store = Store::open(&path).expect("open");
        store.migrate().expect("migrate");
        store
            .employees()
            .upsert(1, new_employee("E1", "Ann", "One", "a@x.com", ""))
            .expect("insert");
    }
    let store = Store::open(&path).expect("reopen");
    store.migrate().expect("migrate");
    assert!(store.employees().get("E1").expect("get").is_some());
}
