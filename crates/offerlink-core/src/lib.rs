pub mod domain;
pub mod dto;
pub mod error;
pub mod matching;

pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use matching::{field_match, find_match, match_all, EmployeeMatch, FieldMatches, MatchKind};
