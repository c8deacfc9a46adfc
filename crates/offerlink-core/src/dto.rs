use crate::matching::MatchKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_email: Option<String>,
    pub employee_number: Option<String>,
    pub kind: Option<MatchKind>,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        self.employee_number.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummaryDto {
    pub candidates: usize,
    pub employees: usize,
    pub perfect: usize,
    pub partial: usize,
    pub unmatched: usize,
    pub results: Vec<MatchResult>,
}

impl MatchSummaryDto {
    pub fn from_results(employees: usize, results: Vec<MatchResult>) -> Self {
        let count_kind = |kind: MatchKind| {
            results
                .iter()
                .filter(|result| result.kind == Some(kind))
                .count()
        };
        let perfect = count_kind(MatchKind::Perfect);
        let partial = count_kind(MatchKind::Partial);
        Self {
            candidates: results.len(),
            employees,
            perfect,
            partial,
            unmatched: results.iter().filter(|result| !result.is_match()).count(),
            results,
        }
    }
}
