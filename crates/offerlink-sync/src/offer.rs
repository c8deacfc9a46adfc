use crate::source::{OfferLetterResponse, OfferLetterSource};
use crate::{Result, SyncError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{Local, TimeZone};
use offerlink_core::domain::Candidate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
const UNNAMED_LETTER: &str = "offer_letter.pdf";

/// Offer letter payload returned by the ATS for one application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferLetter {
    #[serde(default)]
    pub offer_letter_name: Option<String>,
    #[serde(default, rename = "eSignature")]
    pub e_signature: Option<ESignature>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ESignature {
    /// Base64-encoded PDF.
    #[serde(default)]
    pub offer_letter: Option<String>,
    #[serde(default)]
    pub offer_letter_created: Option<i64>,
    #[serde(default)]
    pub offer_letter_completed: Option<i64>,
}

impl OfferLetter {
    pub fn created_at_ms(&self) -> Option<i64> {
        self.e_signature
            .as_ref()
            .and_then(|sig| sig.offer_letter_created)
    }

    pub fn completed_at_ms(&self) -> Option<i64> {
        self.e_signature
            .as_ref()
            .and_then(|sig| sig.offer_letter_completed)
    }

    pub fn encoded_pdf(&self) -> Option<&str> {
        self.e_signature
            .as_ref()
            .and_then(|sig| sig.offer_letter.as_deref())
            .filter(|data| !data.trim().is_empty())
    }
}

/// Metadata kept for each offer letter inside the lookback window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferLetterRecord {
    pub application_id: String,
    pub candidate_email: Option<String>,
    pub name: Option<String>,
    pub created_at_ms: i64,
    pub completed_at_ms: Option<i64>,
    pub saved_to: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct OfferFetchOptions {
    pub now_utc_ms: i64,
    pub days_back: i64,
    pub output_dir: PathBuf,
}

impl OfferFetchOptions {
    pub fn cutoff_ms(&self) -> i64 {
        cutoff_ms(self.now_utc_ms, self.days_back)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OfferFetchReport {
    pub letters: Vec<OfferLetterRecord>,
    pub skipped: usize,
    pub warnings: Vec<String>,
}

impl OfferFetchReport {
    pub fn saved_count(&self) -> usize {
        self.letters
            .iter()
            .filter(|letter| letter.saved_to.is_some())
            .count()
    }

    fn skip(&mut self, warning: String) {
        warn!("{warning}");
        self.skipped += 1;
        self.warnings.push(warning);
    }
}

pub fn cutoff_ms(now_utc_ms: i64, days_back: i64) -> i64 {
    now_utc_ms.saturating_sub(days_back.saturating_mul(MILLIS_PER_DAY))
}

/// `OfferLetter_{application}_{YYYYMMDD}_{name}` with the local date of the
/// timestamp. Path separators in the letter name are replaced.
pub fn offer_file_name(application_id: &str, timestamp_ms: i64, name: Option<&str>) -> String {
    let date = Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%Y%m%d").to_string())
        .unwrap_or_else(|| "00000000".to_string());
    let name = name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNNAMED_LETTER);
    let safe_name: String = name
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
        .collect();
    let safe_id: String = application_id
        .chars()
        .map(|ch| if matches!(ch, '/' | '\\') { '_' } else { ch })
        .collect();
    format!("OfferLetter_{safe_id}_{date}_{safe_name}")
}

pub fn decode_pdf(encoded: &str) -> Result<Vec<u8>> {
    let compact: String = encoded.chars().filter(|ch| !ch.is_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|err| SyncError::Decode(err.to_string()))
}

pub fn save_pdf(output_dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
    }
    let path = output_dir.join(file_name);
    fs::write(&path, bytes)?;
    Ok(path)
}

/// Downloads offer letters for `candidates`, keeping those created inside the
/// lookback window and writing their PDFs to `options.output_dir`.
///
/// Per-candidate problems (missing application id, non-success status, no
/// creation date, undecodable PDF) are recorded as warnings. Transport and
/// filesystem errors abort the run.
pub fn fetch_offer_letters<S>(
    source: &S,
    candidates: &[Candidate],
    options: &OfferFetchOptions,
) -> Result<OfferFetchReport>
where
    S: OfferLetterSource + ?Sized,
{
    let cutoff = options.cutoff_ms();
    let mut report = OfferFetchReport::default();

    for candidate in candidates {
        let Some(application_id) = candidate.application_id() else {
            report.skip(format!(
                "skipping candidate {} due to missing application id",
                candidate.id.as_deref().unwrap_or("Unknown")
            ));
            continue;
        };

        let letter = match source.fetch_offer_letter(application_id)? {
            OfferLetterResponse::Found(letter) => letter,
            OfferLetterResponse::Failed { status, body } => {
                report.skip(format!(
                    "error fetching offer letter for application {application_id}: {status}, {}",
                    body.trim()
                ));
                continue;
            }
        };

        let Some(created) = letter.created_at_ms() else {
            report.skip(format!(
                "no creation date found for application {application_id}"
            ));
            continue;
        };

        if created < cutoff {
            debug!(application_id, created, cutoff, "offer letter outside lookback window");
            continue;
        }

        info!(
            application_id,
            candidate = candidate.label(),
            created,
            "offer letter in window"
        );

        let stamp = letter.completed_at_ms().unwrap_or(created);
        let file_name = offer_file_name(application_id, stamp, letter.offer_letter_name.as_deref());
        let saved_to = match letter.encoded_pdf() {
            Some(encoded) => match decode_pdf(encoded) {
                Ok(bytes) => {
                    let path = save_pdf(&options.output_dir, &file_name, &bytes)?;
                    info!(path = %path.display(), "saved offer letter");
                    Some(path)
                }
                Err(err) => {
                    let warning = format!("application {application_id}: {err}");
                    warn!("{warning}");
                    report.warnings.push(warning);
                    None
                }
            },
            None => {
                let warning = format!("no PDF content found for application {application_id}");
                warn!("{warning}");
                report.warnings.push(warning);
                None
            }
        };

        report.letters.push(OfferLetterRecord {
            application_id: application_id.to_string(),
            candidate_email: candidate.email.clone(),
            name: letter.offer_letter_name.clone(),
            created_at_ms: created,
            completed_at_ms: letter.completed_at_ms(),
            saved_to,
        });
    }

    info!(
        kept = report.letters.len(),
        saved = report.saved_count(),
        skipped = report.skipped,
        "offer letters fetched"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::{
        cutoff_ms, decode_pdf, fetch_offer_letters, offer_file_name, ESignature, OfferFetchOptions,
        OfferLetter,
    };
    use crate::source::{OfferLetterResponse, OfferLetterSource};
    use crate::Result;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use chrono::{Local, TimeZone};
    use offerlink_core::domain::{Application, Candidate};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    const NOW_MS: i64 = 1_900_000_000_000;
    const DAY_MS: i64 = 86_400_000;
    const PDF: &[u8] = b"%PDF-1.4\n%test\n";

    struct FakeOffers {
        responses: HashMap<String, OfferLetterResponse>,
    }

    impl OfferLetterSource for FakeOffers {
        fn fetch_offer_letter(&self, application_id: &str) -> Result<OfferLetterResponse> {
            Ok(self
                .responses
                .get(application_id)
                .cloned()
                .unwrap_or(OfferLetterResponse::Failed {
                    status: 404,
                    body: "not found".to_string(),
                }))
        }
    }

    fn candidate(email: &str, application_id: Option<&str>) -> Candidate {
        Candidate {
            id: Some(format!("cand-{email}")),
            email: Some(email.to_string()),
            application: Some(Application {
                workflow_state: Some("UKG Pro Onboarding Success".to_string()),
                e_id: application_id.map(str::to_string),
            }),
            ..Default::default()
        }
    }

    fn letter(created: Option<i64>, completed: Option<i64>, pdf: Option<&[u8]>) -> OfferLetter {
        OfferLetter {
            offer_letter_name: Some("offer.pdf".to_string()),
            e_signature: Some(ESignature {
                offer_letter: pdf.map(|bytes| STANDARD.encode(bytes)),
                offer_letter_created: created,
                offer_letter_completed: completed,
            }),
        }
    }

    #[test]
    fn deserializes_offer_letter_payload() {
        let json = format!(
            r#"{{"offerLetterName": "offer.pdf", "eSignature": {{"offerLetter": "{}", "offerLetterCreated": 1700000000000, "offerLetterCompleted": 1700000100000}}}}"#,
            STANDARD.encode(PDF)
        );
        let parsed: OfferLetter = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed.created_at_ms(), Some(1_700_000_000_000));
        assert_eq!(parsed.completed_at_ms(), Some(1_700_000_100_000));
        let bytes = decode_pdf(parsed.encoded_pdf().expect("pdf")).expect("decode");
        assert_eq!(bytes, PDF);
    }

    #[test]
    fn decode_pdf_ignores_line_breaks_and_rejects_garbage() {
        let encoded = STANDARD.encode(PDF);
        let wrapped = format!("{}\n{}", &encoded[..8], &encoded[8..]);
        assert_eq!(decode_pdf(&wrapped).expect("decode"), PDF);
        assert!(decode_pdf("not base64!").is_err());
    }

    #[test]
    fn cutoff_subtracts_whole_days() {
        assert_eq!(cutoff_ms(NOW_MS, 30), NOW_MS - 30 * DAY_MS);
    }

    #[test]
    fn offer_file_name_uses_local_completion_date() {
        let completed = Local.with_ymd_and_hms(2030, 1, 15, 12, 0, 0).unwrap();
        let name = offer_file_name("A1", completed.timestamp_millis(), Some("Offer/Final.pdf"));
        assert_eq!(name, "OfferLetter_A1_20300115_Offer_Final.pdf");
    }

    #[test]
    fn offer_file_name_defaults_missing_name() {
        let completed = Local.with_ymd_and_hms(2030, 1, 15, 12, 0, 0).unwrap();
        let name = offer_file_name("A1", completed.timestamp_millis(), None);
        assert_eq!(name, "OfferLetter_A1_20300115_offer_letter.pdf");
    }

    #[test]
    fn fetch_offer_letters_filters_window_and_saves_pdfs() {
        let temp = TempDir::new().expect("tempdir");
        let out = temp.path().join("letters");
        let recent = NOW_MS - DAY_MS;
        let old = NOW_MS - 40 * DAY_MS;

        let mut responses = HashMap::new();
        responses.insert(
            "A1".to_string(),
            OfferLetterResponse::Found(letter(Some(recent), Some(recent + 1000), Some(PDF))),
        );
        responses.insert(
            "A2".to_string(),
            OfferLetterResponse::Found(letter(Some(old), Some(old), Some(PDF))),
        );
        responses.insert(
            "A3".to_string(),
            OfferLetterResponse::Found(letter(Some(recent), None, None)),
        );
        responses.insert(
            "A4".to_string(),
            OfferLetterResponse::Found(letter(None, None, Some(PDF))),
        );
        let source = FakeOffers { responses };

        let candidates = vec![
            candidate("a@x.com", Some("A1")),
            candidate("b@x.com", Some("A2")),
            candidate("c@x.com", Some("A3")),
            candidate("d@x.com", Some("A4")),
            candidate("e@x.com", None),
            candidate("f@x.com", Some("A404")),
        ];
        let options = OfferFetchOptions {
            now_utc_ms: NOW_MS,
            days_back: 30,
            output_dir: out.clone(),
        };
        let report = fetch_offer_letters(&source, &candidates, &options).expect("fetch");

        let ids: Vec<&str> = report
            .letters
            .iter()
            .map(|l| l.application_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A1", "A3"]);
        assert_eq!(report.saved_count(), 1);
        assert_eq!(report.skipped, 3);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("no PDF content found for application A3")));

        let saved = report.letters[0].saved_to.as_ref().expect("saved path");
        assert!(saved.starts_with(&out));
        assert_eq!(fs::read(saved).expect("read pdf"), PDF);
        assert!(report.letters[1].saved_to.is_none());
    }

    #[test]
    fn undecodable_pdf_is_reported_not_fatal() {
        let temp = TempDir::new().expect("tempdir");
        let mut bad = letter(Some(NOW_MS), Some(NOW_MS), None);
        if let Some(sig) = bad.e_signature.as_mut() {
            sig.offer_letter = Some("***".to_string());
        }
        let mut responses = HashMap::new();
        responses.insert("A1".to_string(), OfferLetterResponse::Found(bad));
        let source = FakeOffers { responses };

        let options = OfferFetchOptions {
            now_utc_ms: NOW_MS,
            days_back: 30,
            output_dir: temp.path().to_path_buf(),
        };
        let report =
            fetch_offer_letters(&source, &[candidate("a@x.com", Some("A1"))], &options)
                .expect("fetch");
        assert_eq!(report.letters.len(), 1);
        assert!(report.letters[0].saved_to.is_none());
        assert_eq!(report.warnings.len(), 1);
    }
}
