use crate::error::{Result, StoreError};
use offerlink_core::domain::{Employee, EmployeeStatus};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

/// Input row for inserting or replacing a directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeNew {
    pub employee_number: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub status: EmployeeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryEntry {
    #[serde(flatten)]
    pub employee: Employee,
    pub status: EmployeeStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

pub struct EmployeesRepo<'a> {
    conn: &'a Connection,
}

impl<'a> EmployeesRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn upsert(&self, now_utc: i64, input: EmployeeNew) -> Result<DirectoryEntry> {
        let tx = self.conn.unchecked_transaction()?;
        upsert_inner(&tx, now_utc, &input)?;
        let entry = get_inner(&tx, input.employee_number.trim())?
            .ok_or_else(|| StoreError::NotFound(input.employee_number.clone()))?;
        tx.commit()?;
        Ok(entry)
    }

    /// Upserts every row in one transaction; nothing is written if any row fails.
    pub fn import(&self, now_utc: i64, inputs: Vec<EmployeeNew>) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for input in &inputs {
            upsert_inner(&tx, now_utc, input)?;
        }
        tx.commit()?;
        Ok(inputs.len())
    }

    pub fn get(&self, employee_number: &str) -> Result<Option<DirectoryEntry>> {
        get_inner(self.conn, employee_number.trim())
    }

    /// Employees eligible for matching: every status except terminated,
    /// ordered by employee number so repeated runs scan in the same order.
    pub fn list_active(&self) -> Result<Vec<Employee>> {
        let mut stmt = self.conn.prepare(
            "SELECT employee_number, first_name, last_name, email, phone_number
             FROM employees
             WHERE status <> 'T'
             ORDER BY employee_number ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut employees = Vec::new();
        while let Some(row) = rows.next()? {
            employees.push(employee_from_row(row)?);
        }
        Ok(employees)
    }

    pub fn list_all(&self) -> Result<Vec<DirectoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT employee_number, first_name, last_name, email, phone_number,
                    status, created_at, updated_at
             FROM employees
             ORDER BY employee_number ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(entry_from_row(row)?);
        }
        Ok(entries)
    }

    pub fn set_status(
        &self,
        now_utc: i64,
        employee_number: &str,
        status: EmployeeStatus,
    ) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE employees SET status = ?1, updated_at = ?2 WHERE employee_number = ?3;",
            params![status.as_str(), now_utc, employee_number.trim()],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(employee_number.to_string()));
        }
        Ok(())
    }

    pub fn count_active(&self) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM employees WHERE status <> 'T';",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn upsert_inner(conn: &Connection, now_utc: i64, input: &EmployeeNew) -> Result<()> {
    let employee = Employee {
        employee_number: input.employee_number.trim().to_string(),
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        email: input.email.clone(),
        phone_number: input.phone_number.clone(),
    };
    employee.validate()?;

    conn.execute(
        "INSERT INTO employees
            (employee_number, first_name, last_name, email, phone_number, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
         ON CONFLICT(employee_number) DO UPDATE SET
            first_name = excluded.first_name,
            last_name = excluded.last_name,
            email = excluded.email,
            phone_number = excluded.phone_number,
            status = excluded.status,
            updated_at = excluded.updated_at;",
        params![
            employee.employee_number,
            employee.first_name,
            employee.last_name,
            employee.email,
            employee.phone_number,
            input.status.as_str(),
            now_utc,
        ],
    )?;
    Ok(())
}

fn get_inner(conn: &Connection, employee_number: &str) -> Result<Option<DirectoryEntry>> {
    let mut stmt = conn.prepare(
        "SELECT employee_number, first_name, last_name, email, phone_number,
                status, created_at, updated_at
         FROM employees
         WHERE employee_number = ?1;",
    )?;
    let mut rows = stmt.query([employee_number])?;
    match rows.next()? {
        Some(row) => Ok(Some(entry_from_row(row)?)),
        None => Ok(None),
    }
}

fn employee_from_row(row: &Row<'_>) -> Result<Employee> {
    Ok(Employee {
        employee_number: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone_number: row.get(4)?,
    })
}

fn entry_from_row(row: &Row<'_>) -> Result<DirectoryEntry> {
    let raw_status: String = row.get(5)?;
    let status = EmployeeStatus::parse(&raw_status)
        .ok_or_else(|| StoreError::InvalidStatus(raw_status.clone()))?;
    Ok(DirectoryEntry {
        employee: employee_from_row(row)?,
        status,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}
