//! Credential decoding for the spreadsheet feed.
//!
//! Deployments provide a single opaque env blob that is either plain JSON or
//! Base64-wrapped JSON. Decoding runs an ordered list of strategies and
//! returns the first success; when none applies, the error carries every
//! strategy's failure so the operator sees why each one was rejected.

use std::fmt;

use base64::Engine;
use serde::Deserialize;

/// Credential material accepted by the Sheets API client: an API key for
/// public sheets, or a ready OAuth access token. Token acquisition itself
/// happens outside this job.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Credentials {
    pub fn is_usable(&self) -> bool {
        self.api_key.is_some() || self.access_token.is_some()
    }
}

// Secrets never land in logs, even at debug level.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field(
                "access_token",
                &self.access_token.as_deref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Debug)]
pub enum CredsError {
    /// The env blob was absent or blank.
    Missing,
    /// A strategy parsed the blob, but it held neither key nor token.
    Unusable,
    /// Every decode strategy failed; one message per strategy.
    AllStrategiesFailed(Vec<String>),
}

impl fmt::Display for CredsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredsError::Missing => write!(f, "credentials blob is empty"),
            CredsError::Unusable => {
                write!(f, "credentials decoded but contain no api_key or access_token")
            }
            CredsError::AllStrategiesFailed(failures) => {
                write!(f, "no decode strategy applied: {}", failures.join("; "))
            }
        }
    }
}

impl std::error::Error for CredsError {}

/// Decodes the credentials blob: plain JSON first, then Base64-wrapped JSON.
pub fn decode_credentials(raw: &str) -> Result<Credentials, CredsError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CredsError::Missing);
    }

    let mut failures = Vec::new();

    match serde_json::from_str::<Credentials>(raw) {
        Ok(creds) => return check_usable(creds),
        Err(e) => failures.push(format!("json: {e}")),
    }

    match base64::engine::general_purpose::STANDARD.decode(raw) {
        Ok(bytes) => match serde_json::from_slice::<Credentials>(&bytes) {
            Ok(creds) => return check_usable(creds),
            Err(e) => failures.push(format!("base64+json: {e}")),
        },
        Err(e) => failures.push(format!("base64: {e}")),
    }

    Err(CredsError::AllStrategiesFailed(failures))
}

fn check_usable(creds: Credentials) -> Result<Credentials, CredsError> {
    if creds.is_usable() {
        Ok(creds)
    } else {
        Err(CredsError::Unusable)
    }
}
