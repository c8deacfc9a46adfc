pub mod employees;

pub use employees::{DirectoryEntry, EmployeeNew, EmployeesRepo};
