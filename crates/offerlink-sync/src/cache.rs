use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

pub const CANDIDATE_CACHE_FILE: &str = "candidate_data.json";
pub const OFFER_LETTER_CACHE_FILE: &str = "offer_letter_data.json";

/// Returns `None` when no cache file exists yet.
pub fn load_cached<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    debug!(path = %path.display(), "loading cached data");
    let data = fs::read_to_string(path)?;
    let value = serde_json::from_str(&data)?;
    Ok(Some(value))
}

pub fn store_cached<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = fs::File::create(path)?;
    serde_json::to_writer_pretty(&mut file, value)?;
    writeln!(file)?;
    debug!(path = %path.display(), "cache written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_cached, store_cached, CANDIDATE_CACHE_FILE};
    use offerlink_core::domain::Candidate;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_cache_is_none() {
        let temp = TempDir::new().expect("tempdir");
        let loaded: Option<Vec<Candidate>> =
            load_cached(&temp.path().join(CANDIDATE_CACHE_FILE)).expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn stored_candidates_load_back() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("nested").join(CANDIDATE_CACHE_FILE);
        let candidates = vec![Candidate {
            email: Some("jane@x.com".to_string()),
            home_phone: Some("555-123-4567".to_string()),
            ..Default::default()
        }];
        store_cached(&path, &candidates).expect("store");

        let raw = fs::read_to_string(&path).expect("read");
        assert!(raw.contains("\"homePhone\""));

        let loaded: Vec<Candidate> = load_cached(&path).expect("load").expect("cached");
        assert_eq!(loaded, candidates);
    }

    #[test]
    fn corrupt_cache_is_an_error() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join(CANDIDATE_CACHE_FILE);
        fs::write(&path, "{not json").expect("write");
        let loaded: crate::Result<Option<Vec<Candidate>>> = load_cached(&path);
        assert!(loaded.is_err());
    }
}
