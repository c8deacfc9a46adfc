pub mod candidate;
pub mod employee;
pub mod phone;

pub use candidate::{filter_by_workflow_state, Application, Candidate};
pub use employee::{Employee, EmployeeStatus};
pub use phone::normalize_phone;
