use anyhow::{Context as _, Result};
use offerlink_config::{AppConfig, AtsCredentials};
use offerlink_store::{paths, Store};
use offerlink_sync::ats::{AtsClient, AtsEndpoint};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod candidates;
pub mod completions;
pub mod employees;
pub mod matching;
pub mod offers;
pub mod run;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    pub config: &'a AppConfig,
}

impl Context<'_> {
    pub fn cache_file(&self, name: &str) -> Result<PathBuf> {
        let dir = paths::resolve_cache_dir(self.config.cache.dir.as_deref())
            .with_context(|| "resolve cache directory")?;
        Ok(dir.join(name))
    }

    pub fn ats_client(&self) -> Result<AtsClient> {
        let credentials = self.credentials()?;
        self.build_client(credentials)
    }

    /// Offer letter requests are scoped to a company, so the id is required.
    pub fn offer_client(&self) -> Result<AtsClient> {
        let credentials = self.credentials()?;
        credentials
            .require_company_id()
            .with_context(|| "offer letters need a company id")?;
        self.build_client(credentials)
    }

    fn credentials(&self) -> Result<AtsCredentials> {
        self.config
            .ats
            .credentials()
            .with_context(|| "resolve ATS credentials")
    }

    fn build_client(&self, credentials: AtsCredentials) -> Result<AtsClient> {
        let endpoint = AtsEndpoint {
            base_url: credentials.base_url,
            api_key: credentials.api_key,
            api_secret: credentials.api_secret,
            company_id: credentials.company_id,
            signature_type: self.config.offers.signature_type.clone(),
            user_agent: credentials.user_agent,
        };
        AtsClient::new(endpoint).with_context(|| "create ATS client")
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
