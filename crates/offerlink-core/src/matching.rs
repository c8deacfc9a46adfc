//! Candidate to employee matching.
//!
//! Four fields are compared with exact equality after phone normalization:
//! first name, last name, email, and phone (home or mobile). A match on all
//! four returns immediately. Two or three matching fields make a partial
//! match, except when the only matches are first and last name. When several
//! employees are partial matches the last one scanned wins.

use crate::domain::{normalize_phone, Candidate, Employee};
use crate::dto::MatchResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Perfect,
    Partial,
}

impl MatchKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            MatchKind::Perfect => "perfect",
            MatchKind::Partial => "partial",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldMatches {
    pub first_name: bool,
    pub last_name: bool,
    pub email: bool,
    pub phone: bool,
}

impl FieldMatches {
    pub fn count(&self) -> usize {
        [self.first_name, self.last_name, self.email, self.phone]
            .into_iter()
            .filter(|matched| *matched)
            .count()
    }

    pub fn is_name_only(&self) -> bool {
        self.first_name && self.last_name && !self.email && !self.phone
    }

    pub fn kind(&self) -> Option<MatchKind> {
        match self.count() {
            4 => Some(MatchKind::Perfect),
            2 | 3 if !self.is_name_only() => Some(MatchKind::Partial),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeMatch<'a> {
    pub employee: &'a Employee,
    pub kind: MatchKind,
    pub fields: FieldMatches,
}

impl EmployeeMatch<'_> {
    pub fn employee_number(&self) -> &str {
        &self.employee.employee_number
    }
}

/// True only when both values are present, non-empty and identical.
pub fn field_match(left: Option<&str>, right: Option<&str>) -> bool {
    match (left, right) {
        (Some(left), Some(right)) => !left.is_empty() && !right.is_empty() && left == right,
        _ => false,
    }
}

struct CandidateKeys<'a> {
    first_name: Option<&'a str>,
    last_name: Option<&'a str>,
    email: Option<&'a str>,
    home_phone: Option<String>,
    mobile_phone: Option<String>,
}

impl<'a> CandidateKeys<'a> {
    fn from_candidate(candidate: &'a Candidate) -> Self {
        Self {
            first_name: candidate.first_name.as_deref(),
            last_name: candidate.last_name.as_deref(),
            email: candidate.email.as_deref(),
            home_phone: candidate.home_phone.as_deref().map(normalize_phone),
            mobile_phone: candidate.mobile.as_deref().map(normalize_phone),
        }
    }

    fn compare(&self, employee: &Employee) -> FieldMatches {
        let employee_phone = employee.phone_number.as_deref();
        FieldMatches {
            first_name: field_match(self.first_name, employee.first_name.as_deref()),
            last_name: field_match(self.last_name, employee.last_name.as_deref()),
            email: field_match(self.email, employee.email.as_deref()),
            phone: field_match(self.home_phone.as_deref(), employee_phone)
                || field_match(self.mobile_phone.as_deref(), employee_phone),
        }
    }
}

pub fn compare_fields(candidate: &Candidate, employee: &Employee) -> FieldMatches {
    CandidateKeys::from_candidate(candidate).compare(employee)
}

/// Picks the best employee for `candidate`, scanning `employees` in order.
pub fn find_match<'a>(candidate: &Candidate, employees: &'a [Employee]) -> Option<EmployeeMatch<'a>> {
    let keys = CandidateKeys::from_candidate(candidate);
    let mut best_partial = None;

    for employee in employees {
        let fields = keys.compare(employee);
        match fields.kind() {
            Some(MatchKind::Perfect) => {
                return Some(EmployeeMatch {
                    employee,
                    kind: MatchKind::Perfect,
                    fields,
                });
            }
            Some(MatchKind::Partial) => {
                best_partial = Some(EmployeeMatch {
                    employee,
                    kind: MatchKind::Partial,
                    fields,
                });
            }
            None => {}
        }
    }

    best_partial
}

/// Matches every candidate against the full employee list, keeping input order.
pub fn match_all(candidates: &[Candidate], employees: &[Employee]) -> Vec<MatchResult> {
    candidates
        .iter()
        .map(|candidate| {
            let found = find_match(candidate, employees);
            MatchResult {
                candidate_email: candidate.email.clone(),
                employee_number: found.map(|m| m.employee.employee_number.clone()),
                kind: found.map(|m| m.kind),
            }
        })
        .collect()
}
