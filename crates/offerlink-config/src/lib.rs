use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "offerlink";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_PAGE_SIZE: u32 = 500;
pub const MAX_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_DAYS_BACK: i64 = 30;
pub const MAX_DAYS_BACK: i64 = 3650;
pub const DEFAULT_SIGNATURE_TYPE: &str = "ESIGNATURE";
pub const DEFAULT_OUTPUT_DIR: &str = "offer_letters";
pub const DEFAULT_API_KEY_ENV: &str = "OFFERLINK_API_KEY";
pub const DEFAULT_API_SECRET_ENV: &str = "OFFERLINK_API_SECRET";
pub const BASE_URL_ENV: &str = "OFFERLINK_BASE_URL";
pub const COMPANY_ID_ENV: &str = "OFFERLINK_COMPANY_ID";
pub const DEFAULT_WORKFLOW_STATES: [&str; 2] =
    ["UKG Pro Onboarding Error", "UKG Pro Onboarding Success"];

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub ats: AtsConfig,
    pub offers: OffersConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone)]
pub struct AtsConfig {
    pub base_url: Option<String>,
    pub company_id: Option<String>,
    pub api_key_env: String,
    pub api_secret_env: String,
    pub page_size: u32,
    pub workflow_states: Vec<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OffersConfig {
    pub days_back: i64,
    pub output_dir: PathBuf,
    pub signature_type: String,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub dir: Option<PathBuf>,
    pub candidates: bool,
    pub offer_letters: bool,
}

/// Settings needed to talk to the applicant-tracking API, resolved from the
/// config file and the process environment.
#[derive(Clone)]
pub struct AtsCredentials {
    pub base_url: String,
    pub company_id: Option<String>,
    pub api_key: String,
    pub api_secret: String,
    pub user_agent: Option<String>,
}

impl std::fmt::Debug for AtsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AtsCredentials")
            .field("base_url", &self.base_url)
            .field("company_id", &self.company_id)
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl AtsCredentials {
    pub fn require_company_id(&self) -> Result<&str> {
        self.company_id
            .as_deref()
            .ok_or(ConfigError::MissingSetting("ats.company_id"))
    }
}

impl Default for AtsConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            company_id: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_secret_env: DEFAULT_API_SECRET_ENV.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            workflow_states: DEFAULT_WORKFLOW_STATES
                .iter()
                .map(|state| state.to_string())
                .collect(),
            user_agent: None,
        }
    }
}

impl Default for OffersConfig {
    fn default() -> Self {
        Self {
            days_back: DEFAULT_DAYS_BACK,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            signature_type: DEFAULT_SIGNATURE_TYPE.to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            candidates: true,
            offer_letters: false,
        }
    }
}

impl AtsConfig {
    pub fn credentials(&self) -> Result<AtsCredentials> {
        self.credentials_with(|key| env::var(key).ok())
    }

    pub fn credentials_with<F>(&self, lookup: F) -> Result<AtsCredentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let base_url = non_empty(self.base_url.clone())
            .or_else(|| non_empty(lookup(BASE_URL_ENV)))
            .ok_or(ConfigError::MissingSetting("ats.base_url"))?;
        let company_id =
            non_empty(self.company_id.clone()).or_else(|| non_empty(lookup(COMPANY_ID_ENV)));
        let api_key = non_empty(lookup(&self.api_key_env))
            .ok_or_else(|| ConfigError::MissingEnv(self.api_key_env.clone()))?;
        let api_secret = non_empty(lookup(&self.api_secret_env))
            .ok_or_else(|| ConfigError::MissingEnv(self.api_secret_env.clone()))?;

        Ok(AtsCredentials {
            base_url: base_url.trim_end_matches('/').to_string(),
            company_id,
            api_key,
            api_secret,
            user_agent: self.user_agent.clone(),
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid ats.page_size value: {0}")]
    InvalidPageSize(i64),
    #[error("invalid offers.days_back value: {0}")]
    InvalidDaysBack(i64),
    #[error("invalid ats.workflow_states: {0}")]
    InvalidWorkflowStates(String),
    #[error("invalid config field {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("missing config setting: {0}")]
    MissingSetting(&'static str),
    #[error("environment variable {0} is not set")]
    MissingEnv(String),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    ats: Option<AtsFile>,
    offers: Option<OffersFile>,
    cache: Option<CacheFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AtsFile {
    base_url: Option<String>,
    company_id: Option<String>,
    api_key_env: Option<String>,
    api_secret_env: Option<String>,
    page_size: Option<i64>,
    workflow_states: Option<Vec<String>>,
    user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OffersFile {
    days_back: Option<i64>,
    output_dir: Option<PathBuf>,
    signature_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CacheFile {
    dir: Option<PathBuf>,
    candidates: Option<bool>,
    offer_letters: Option<bool>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(ats) = parsed.ats {
        merge_ats(&mut config.ats, ats)?;
    }

    if let Some(offers) = parsed.offers {
        if let Some(days_back) = offers.days_back {
            if days_back <= 0 || days_back > MAX_DAYS_BACK {
                return Err(ConfigError::InvalidDaysBack(days_back));
            }
            config.offers.days_back = days_back;
        }
        if let Some(dir) = offers.output_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::InvalidField {
                    field: "offers.output_dir",
                    message: "must not be empty".to_string(),
                });
            }
            config.offers.output_dir = dir;
        }
        if let Some(signature_type) = offers.signature_type {
            config.offers.signature_type =
                required_text("offers.signature_type", signature_type)?;
        }
    }

    if let Some(cache) = parsed.cache {
        if let Some(dir) = cache.dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::InvalidField {
                    field: "cache.dir",
                    message: "must not be empty".to_string(),
                });
            }
            config.cache.dir = Some(dir);
        }
        if let Some(enabled) = cache.candidates {
            config.cache.candidates = enabled;
        }
        if let Some(enabled) = cache.offer_letters {
            config.cache.offer_letters = enabled;
        }
    }

    Ok(config)
}

fn merge_ats(config: &mut AtsConfig, parsed: AtsFile) -> Result<()> {
    if let Some(base_url) = parsed.base_url {
        let base_url = required_text("ats.base_url", base_url)?;
        if !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidField {
                field: "ats.base_url",
                message: "must use https".to_string(),
            });
        }
        config.base_url = Some(base_url);
    }
    if let Some(company_id) = parsed.company_id {
        config.company_id = Some(required_text("ats.company_id", company_id)?);
    }
    if let Some(name) = parsed.api_key_env {
        config.api_key_env = required_text("ats.api_key_env", name)?;
    }
    if let Some(name) = parsed.api_secret_env {
        config.api_secret_env = required_text("ats.api_secret_env", name)?;
    }
    if let Some(page_size) = parsed.page_size {
        if page_size <= 0 || page_size > i64::from(MAX_PAGE_SIZE) {
            return Err(ConfigError::InvalidPageSize(page_size));
        }
        config.page_size = page_size as u32;
    }
    if let Some(states) = parsed.workflow_states {
        if states.is_empty() {
            return Err(ConfigError::InvalidWorkflowStates(
                "at least one state is required".to_string(),
            ));
        }
        let mut cleaned = Vec::with_capacity(states.len());
        for state in states {
            let trimmed = state.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::InvalidWorkflowStates(
                    "state names must not be empty".to_string(),
                ));
            }
            if cleaned.iter().any(|existing: &String| existing == trimmed) {
                return Err(ConfigError::InvalidWorkflowStates(format!(
                    "duplicate state {trimmed}"
                )));
            }
            cleaned.push(trimmed.to_string());
        }
        config.workflow_states = cleaned;
    }
    if let Some(user_agent) = parsed.user_agent {
        config.user_agent = Some(required_text("ats.user_agent", user_agent)?);
    }
    Ok(())
}

fn required_text(field: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidField {
            field,
            message: "must not be empty".to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
