use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("employee number is required")]
    EmptyEmployeeNumber,
    #[error("invalid employee status: {0}")]
    InvalidEmployeeStatus(String),
}
