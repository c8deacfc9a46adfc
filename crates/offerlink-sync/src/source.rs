use crate::offer::OfferLetter;
use crate::Result;
use offerlink_core::domain::Candidate;

/// One page of the candidate listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidatePage {
    Candidates(Vec<Candidate>),
    /// The response had no `candidates` array; carries a short excerpt.
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferLetterResponse {
    Found(OfferLetter),
    Failed { status: u16, body: String },
}

pub trait CandidateSource {
    fn source_name(&self) -> &'static str;
    /// `start` is 1-based, matching the API's paging parameters.
    fn fetch_candidate_page(&self, start: u32, count: u32) -> Result<CandidatePage>;
}

pub trait OfferLetterSource {
    fn fetch_offer_letter(&self, application_id: &str) -> Result<OfferLetterResponse>;
}
