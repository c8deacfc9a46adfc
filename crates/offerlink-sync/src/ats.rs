use crate::source::{CandidatePage, CandidateSource};
use crate::{Result, SyncError};
use offerlink_core::domain::{filter_by_workflow_state, Candidate};
use serde::Deserialize;
use tracing::{debug, info, warn};

const EXCERPT_LIMIT: usize = 200;

/// Connection settings for the applicant-tracking API.
#[derive(Clone)]
pub struct AtsEndpoint {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub company_id: Option<String>,
    pub signature_type: String,
    pub user_agent: Option<String>,
}

impl std::fmt::Debug for AtsEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtsEndpoint")
            .field("base_url", &self.base_url)
            .field("company_id", &self.company_id)
            .field("signature_type", &self.signature_type)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct CandidateListing {
    candidates: Vec<Candidate>,
}

pub fn parse_candidate_page(body: &str) -> Result<CandidatePage> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if value.get("candidates").is_none() {
        return Ok(CandidatePage::Unexpected(excerpt(body)));
    }
    let listing: CandidateListing = serde_json::from_value(value)
        .map_err(|err| SyncError::Parse(format!("candidate listing: {err}")))?;
    Ok(CandidatePage::Candidates(listing.candidates))
}

/// Pages through the candidate listing until a short page, then keeps only
/// candidates in one of `workflow_states`.
pub fn fetch_candidates<S, T>(
    source: &S,
    page_size: u32,
    workflow_states: &[T],
) -> Result<Vec<Candidate>>
where
    S: CandidateSource + ?Sized,
    T: AsRef<str>,
{
    if page_size == 0 {
        return Err(SyncError::Parse("page size must be positive".to_string()));
    }

    let mut start = 1u32;
    let mut all = Vec::new();
    loop {
        debug!(source = source.source_name(), start, count = page_size, "fetching candidate page");
        let page = match source.fetch_candidate_page(start, page_size)? {
            CandidatePage::Candidates(page) => page,
            CandidatePage::Unexpected(excerpt) => {
                warn!(source = source.source_name(), response = %excerpt, "unexpected response format");
                break;
            }
        };
        let received = page.len();
        all.extend(page);
        if received < page_size as usize {
            break;
        }
        start = start.saturating_add(page_size);
    }

    let fetched = all.len();
    let filtered = filter_by_workflow_state(all, workflow_states);
    info!(fetched, kept = filtered.len(), "candidates fetched");
    Ok(filtered)
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(EXCERPT_LIMIT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

#[cfg(feature = "ats-http")]
mod imp {
    use super::{parse_candidate_page, AtsEndpoint};
    use crate::offer::OfferLetter;
    use crate::source::{CandidatePage, CandidateSource, OfferLetterResponse, OfferLetterSource};
    use crate::{Result, SyncError};
    use reqwest::blocking::Client;
    use std::time::Duration;
    use url::Url;

    #[derive(Debug, Clone)]
    pub struct AtsClient {
        endpoint: AtsEndpoint,
        client: Client,
    }

    /// Credentials travel in the query string, so request URLs never reach
    /// error messages.
    fn transport_error(err: reqwest::Error) -> SyncError {
        SyncError::Http(err.without_url())
    }

    impl AtsClient {
        pub fn new(endpoint: AtsEndpoint) -> Result<Self> {
            let url = Url::parse(&endpoint.base_url)?;
            if url.scheme() != "https" {
                return Err(SyncError::Parse("ats base url must use https".to_string()));
            }
            let client = Client::builder()
                .user_agent(endpoint.user_agent.as_deref().unwrap_or("offerlink"))
                .timeout(Duration::from_secs(60))
                .connect_timeout(Duration::from_secs(10))
                .build()?;
            Ok(Self { endpoint, client })
        }

        fn url(&self, path: &str) -> Result<Url> {
            Ok(Url::parse(&format!(
                "{}/{}",
                self.endpoint.base_url.trim_end_matches('/'),
                path
            ))?)
        }
    }

    impl CandidateSource for AtsClient {
        fn source_name(&self) -> &'static str {
            "ats"
        }

        fn fetch_candidate_page(&self, start: u32, count: u32) -> Result<CandidatePage> {
            let start = start.to_string();
            let count = count.to_string();
            let response = self
                .client
                .get(self.url("candidate")?)
                .query(&[
                    ("api", self.endpoint.api_key.as_str()),
                    ("secret", self.endpoint.api_secret.as_str()),
                    ("start", start.as_str()),
                    ("count", count.as_str()),
                ])
                .send()
                .and_then(|response| response.error_for_status())
                .map_err(transport_error)?;
            let body = response.text().map_err(transport_error)?;
            parse_candidate_page(&body)
        }
    }

    impl OfferLetterSource for AtsClient {
        fn fetch_offer_letter(&self, application_id: &str) -> Result<OfferLetterResponse> {
            let company_id = self.endpoint.company_id.as_deref().ok_or_else(|| {
                SyncError::Unavailable("offer letters require a company id".to_string())
            })?;
            let response = self
                .client
                .get(self.url("offerLetter")?)
                .query(&[
                    ("api", self.endpoint.api_key.as_str()),
                    ("secret", self.endpoint.api_secret.as_str()),
                    ("companyId", company_id),
                    ("applicationId", application_id),
                    ("offerSignatureType", self.endpoint.signature_type.as_str()),
                ])
                .send()
                .map_err(transport_error)?;

            let status = response.status();
            let body = response.text().map_err(transport_error)?;
            if !status.is_success() {
                return Ok(OfferLetterResponse::Failed {
                    status: status.as_u16(),
                    body,
                });
            }
            let letter: OfferLetter = serde_json::from_str(&body)?;
            Ok(OfferLetterResponse::Found(letter))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::AtsClient;
        use crate::ats::AtsEndpoint;
        use crate::source::{CandidateSource, OfferLetterSource};

        fn unreachable_client() -> AtsClient {
            AtsClient::new(AtsEndpoint {
                base_url: "https://127.0.0.1:1".to_string(),
                api_key: "KEY123".to_string(),
                api_secret: "TOPSECRET".to_string(),
                company_id: Some("acme".to_string()),
                signature_type: "ESIGNATURE".to_string(),
                user_agent: None,
            })
            .expect("client")
        }

        #[test]
        fn transport_errors_do_not_expose_credentials() {
            let client = unreachable_client();

            let err = client
                .fetch_candidate_page(1, 500)
                .expect_err("connection refused");
            let text = format!("{err} {err:?}");
            assert!(!text.contains("TOPSECRET"), "{text}");
            assert!(!text.contains("KEY123"), "{text}");

            let err = client
                .fetch_offer_letter("A1")
                .expect_err("connection refused");
            let text = format!("{err} {err:?}");
            assert!(!text.contains("TOPSECRET"), "{text}");
        }
    }
}

#[cfg(not(feature = "ats-http"))]
mod imp {
    use super::AtsEndpoint;
    use crate::source::{CandidatePage, CandidateSource, OfferLetterResponse, OfferLetterSource};
    use crate::{Result, SyncError};

    #[derive(Debug, Clone)]
    pub struct AtsClient {
        endpoint: AtsEndpoint,
    }

    impl AtsClient {
        pub fn new(endpoint: AtsEndpoint) -> Result<Self> {
            Ok(Self { endpoint })
        }

        fn unavailable(&self) -> SyncError {
            let _ = &self.endpoint;
            SyncError::Unavailable("ATS access requires the ats-http feature".to_string())
        }
    }

    impl CandidateSource for AtsClient {
        fn source_name(&self) -> &'static str {
            "ats"
        }

        fn fetch_candidate_page(&self, _start: u32, _count: u32) -> Result<CandidatePage> {
            Err(self.unavailable())
        }
    }

    impl OfferLetterSource for AtsClient {
        fn fetch_offer_letter(&self, _application_id: &str) -> Result<OfferLetterResponse> {
            Err(self.unavailable())
        }
    }
}

pub use imp::AtsClient;

#[cfg(test)]
mod tests {
    use super::{fetch_candidates, parse_candidate_page};
    use crate::source::{CandidatePage, CandidateSource};
    use crate::Result;
    use offerlink_core::domain::{Application, Candidate};
    use std::cell::RefCell;

    struct PagedSource {
        pages: RefCell<Vec<CandidatePage>>,
        requests: RefCell<Vec<(u32, u32)>>,
    }

    impl PagedSource {
        fn new(pages: Vec<CandidatePage>) -> Self {
            Self {
                pages: RefCell::new(pages),
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl CandidateSource for PagedSource {
        fn source_name(&self) -> &'static str {
            "test"
        }

        fn fetch_candidate_page(&self, start: u32, count: u32) -> Result<CandidatePage> {
            self.requests.borrow_mut().push((start, count));
            let mut pages = self.pages.borrow_mut();
            if pages.is_empty() {
                return Ok(CandidatePage::Candidates(Vec::new()));
            }
            Ok(pages.remove(0))
        }
    }

    fn candidate(email: &str, state: &str) -> Candidate {
        Candidate {
            email: Some(email.to_string()),
            application: Some(Application {
                workflow_state: Some(state.to_string()),
                e_id: None,
            }),
            ..Default::default()
        }
    }

    const STATES: [&str; 1] = ["UKG Pro Onboarding Success"];

    #[test]
    fn parse_candidate_page_reads_listing() {
        let body = r#"{"total": 1, "candidates": [{"email": "a@x.com", "homePhone": "555"}]}"#;
        let page = parse_candidate_page(body).expect("parse");
        match page {
            CandidatePage::Candidates(list) => {
                assert_eq!(list.len(), 1);
                assert_eq!(list[0].home_phone.as_deref(), Some("555"));
            }
            other => panic!("unexpected page: {other:?}"),
        }
    }

    #[test]
    fn parse_candidate_page_flags_missing_listing() {
        let page = parse_candidate_page(r#"{"status": "denied"}"#).expect("parse");
        assert!(matches!(page, CandidatePage::Unexpected(text) if text.contains("denied")));
    }

    #[test]
    fn parse_candidate_page_rejects_invalid_json() {
        assert!(parse_candidate_page("<html>").is_err());
    }

    #[test]
    fn fetch_candidates_pages_until_short_page() {
        let source = PagedSource::new(vec![
            CandidatePage::Candidates(vec![
                candidate("a@x.com", "UKG Pro Onboarding Success"),
                candidate("b@x.com", "Interview"),
            ]),
            CandidatePage::Candidates(vec![candidate("c@x.com", "UKG Pro Onboarding Success")]),
        ]);
        let kept = fetch_candidates(&source, 2, &STATES).expect("fetch");
        let emails: Vec<&str> = kept.iter().map(|c| c.label()).collect();
        assert_eq!(emails, vec!["a@x.com", "c@x.com"]);
        assert_eq!(*source.requests.borrow(), vec![(1, 2), (3, 2)]);
    }

    #[test]
    fn fetch_candidates_stops_on_unexpected_page_and_keeps_results() {
        let source = PagedSource::new(vec![
            CandidatePage::Candidates(vec![candidate("a@x.com", "UKG Pro Onboarding Success")]),
            CandidatePage::Unexpected("error".to_string()),
        ]);
        let kept = fetch_candidates(&source, 1, &STATES).expect("fetch");
        assert_eq!(kept.len(), 1);
        assert_eq!(source.requests.borrow().len(), 2);
    }

    #[test]
    fn fetch_candidates_requests_one_extra_page_on_exact_multiple() {
        let source = PagedSource::new(vec![CandidatePage::Candidates(vec![
            candidate("a@x.com", "UKG Pro Onboarding Success"),
        ])]);
        let kept = fetch_candidates(&source, 1, &STATES).expect("fetch");
        assert_eq!(kept.len(), 1);
        assert_eq!(*source.requests.borrow(), vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn fetch_candidates_rejects_zero_page_size() {
        let source = PagedSource::new(Vec::new());
        assert!(fetch_candidates(&source, 0, &STATES).is_err());
    }
}
