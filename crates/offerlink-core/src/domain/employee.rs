use crate::error::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_number: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

impl Employee {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.employee_number.trim().is_empty() {
            return Err(CoreError::EmptyEmployeeNumber);
        }
        Ok(())
    }
}

/// Directory status code. Only terminated employees are excluded from matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmployeeStatus {
    #[default]
    #[serde(rename = "A")]
    Active,
    #[serde(rename = "L")]
    Leave,
    #[serde(rename = "T")]
    Terminated,
}

impl EmployeeStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            EmployeeStatus::Active => "A",
            EmployeeStatus::Leave => "L",
            EmployeeStatus::Terminated => "T",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "A" | "a" | "active" => Some(EmployeeStatus::Active),
            "L" | "l" | "leave" => Some(EmployeeStatus::Leave),
            "T" | "t" | "terminated" => Some(EmployeeStatus::Terminated),
            _ => None,
        }
    }

    pub fn parse_strict(value: &str) -> Result<Self, CoreError> {
        Self::parse(value).ok_or_else(|| CoreError::InvalidEmployeeStatus(value.to_string()))
    }

    pub const fn is_active(self) -> bool {
        !matches!(self, EmployeeStatus::Terminated)
    }
}
